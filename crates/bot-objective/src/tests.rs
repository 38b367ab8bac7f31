//! Unit tests for bot-objective.

#[cfg(test)]
mod feed {
    use bot_core::{NoiseKind, Tick, Vec3};
    use crate::{EventFeed, GameEvent};

    fn noise(x: f32) -> GameEvent {
        GameEvent::Noise { source: None, position: Vec3::new(x, 0.0, 0.0), kind: NoiseKind::Footstep }
    }

    #[test]
    fn drains_due_events_in_order_exactly_once() {
        let mut feed = EventFeed::new();
        feed.push(Tick(2), noise(2.0));
        feed.push(Tick(0), noise(0.0));
        feed.push(Tick(0), noise(0.5));
        feed.push(Tick(5), noise(5.0));
        assert_eq!(feed.len(), 4);

        let due = feed.drain_due(Tick(2));
        let xs: Vec<f32> = due
            .iter()
            .map(|e| match e.event {
                GameEvent::Noise { position, .. } => position.x,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![0.0, 0.5, 2.0]);
        assert_eq!(due[2].tick, Tick(2));

        assert!(feed.drain_due(Tick(2)).is_empty());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.next_tick(), Some(Tick(5)));
    }

    #[test]
    fn empty_feed() {
        let mut feed = EventFeed::new();
        assert!(feed.is_empty());
        assert!(feed.drain_due(Tick(100)).is_empty());
        assert_eq!(feed.next_tick(), None);
    }
}

#[cfg(test)]
mod tracker {
    use bot_core::{AgentHandle, AgentId, ObjectiveId, Team, Vec3};
    use crate::{CarryState, GameEvent, ObjectiveError, ObjectiveKind, ObjectiveTracker, RoundPhase};

    const POINT: ObjectiveId = ObjectiveId(0);
    const FLAG: ObjectiveId = ObjectiveId(1);

    fn tracker() -> ObjectiveTracker {
        let mut t = ObjectiveTracker::new();
        t.apply(0.0, &GameEvent::ObjectiveSpawned {
            id: POINT,
            kind: ObjectiveKind::CapturePoint,
            position: Vec3::new(50.0, 0.0, 0.0),
            owner: Team::Red,
        })
        .unwrap();
        t.apply(0.0, &GameEvent::ObjectiveSpawned {
            id: FLAG,
            kind: ObjectiveKind::CarryItem,
            position: Vec3::new(90.0, 0.0, 0.0),
            owner: Team::Blue,
        })
        .unwrap();
        t.apply(0.0, &GameEvent::DestinationSet { id: FLAG, team: Team::Red, position: Vec3::ZERO })
            .unwrap();
        t
    }

    #[test]
    fn capture_flips_owner() {
        let mut t = tracker();
        let h = t.handle(POINT).unwrap();
        assert_eq!(t.owner(h), Some(Team::Red));

        t.apply(1.0, &GameEvent::CaptureProgress { id: POINT, team: Team::Blue, progress: 0.4 }).unwrap();
        assert!(t.is_contested(h));
        assert!(t.any_contested_against(Team::Red));
        assert!(!t.any_contested_against(Team::Blue));

        t.apply(2.0, &GameEvent::Captured { id: POINT, team: Team::Blue }).unwrap();
        assert_eq!(t.owner(h), Some(Team::Blue));
        assert!(!t.is_contested(h));
        assert!(t.is_valid(h), "capturing does not invalidate the handle");
    }

    #[test]
    fn destroyed_objective_stops_resolving() {
        let mut t = tracker();
        let h = t.handle(POINT).unwrap();
        t.apply(1.0, &GameEvent::Destroyed { id: POINT }).unwrap();
        assert!(t.get(h).is_none());
        assert_eq!(t.owner(h), None);
        assert_eq!(t.destination_for(h, Team::Red), None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn respawned_slot_gets_new_generation() {
        let mut t = tracker();
        let old = t.handle(POINT).unwrap();
        t.apply(1.0, &GameEvent::ObjectiveSpawned {
            id: POINT,
            kind: ObjectiveKind::CapturePoint,
            position: Vec3::ZERO,
            owner: Team::Blue,
        })
        .unwrap();
        let new = t.handle(POINT).unwrap();
        assert_ne!(old, new);
        assert!(!t.is_valid(old));
        assert!(t.is_valid(new));
    }

    #[test]
    fn carry_lifecycle_drives_destination() {
        let mut t = tracker();
        let h = t.handle(FLAG).unwrap();
        let carrier = AgentHandle::new(AgentId(3), 0);

        // Not carried: everyone heads for the flag.
        assert_eq!(t.destination_for(h, Team::Red), Some(Vec3::new(90.0, 0.0, 0.0)));

        t.apply(1.0, &GameEvent::PickedUp { id: FLAG, carrier, team: Team::Red }).unwrap();
        assert_eq!(t.carrier(h), Some(carrier));
        assert_eq!(t.destination_for(h, Team::Red), Some(Vec3::ZERO));

        t.apply(1.5, &GameEvent::Moved { id: FLAG, position: Vec3::new(70.0, 0.0, 0.0) }).unwrap();
        assert_eq!(t.destination_for(h, Team::Blue), Some(Vec3::new(70.0, 0.0, 0.0)));

        t.apply(2.0, &GameEvent::Dropped { id: FLAG, position: Vec3::new(60.0, 0.0, 0.0) }).unwrap();
        assert_eq!(t.carrier(h), None);
        assert_eq!(t.get(h).unwrap().carry, CarryState::Dropped);
        assert_eq!(t.destination_for(h, Team::Red), Some(Vec3::new(60.0, 0.0, 0.0)));

        t.apply(3.0, &GameEvent::Returned { id: FLAG }).unwrap();
        assert_eq!(t.get(h).unwrap().position, Vec3::new(90.0, 0.0, 0.0));
        assert_eq!(t.get(h).unwrap().carry, CarryState::AtHome);
    }

    #[test]
    fn unknown_objective_is_rejected() {
        let mut t = tracker();
        let err = t.apply(0.0, &GameEvent::Locked { id: ObjectiveId(9), locked: true }).unwrap_err();
        assert!(matches!(err, ObjectiveError::Unknown(ObjectiveId(9))));
        t.apply(0.0, &GameEvent::Destroyed { id: POINT }).unwrap();
        assert!(t.apply(0.0, &GameEvent::Destroyed { id: POINT }).is_err());
    }

    #[test]
    fn round_phase_follows_feed() {
        let mut t = ObjectiveTracker::new();
        assert_eq!(t.phase(), RoundPhase::Waiting);
        assert_eq!(t.round_elapsed(10.0), 0.0);
        t.apply(5.0, &GameEvent::RoundStarted).unwrap();
        assert!(t.is_round_active());
        assert_eq!(t.round_elapsed(8.0), 3.0);
        t.apply(9.0, &GameEvent::RoundEnded { winner: Some(Team::Red) }).unwrap();
        assert_eq!(t.phase(), RoundPhase::Over { winner: Some(Team::Red) });
    }

    #[test]
    fn combat_events_are_ignored() {
        let mut t = tracker();
        t.apply(0.0, &GameEvent::Kill { victim: AgentId(0), killer: None }).unwrap();
        assert_eq!(t.len(), 2);
    }
}
