//! Integration tests for bot-sim.

use bot_agent::{AgentStore, AgentStoreBuilder};
use bot_behavior::{WeaponStatus, WorldQuery};
use bot_core::{AgentId, SimConfig, Team, Tick, Vec2, Vec3};
use bot_nav::{AStarRouter, NavGraph, NavGraphBuilder, NodeFlags};

use crate::{KinematicSink, Sim, SimBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f32 = 0.1;

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_interval_secs:      DT,
        total_ticks,
        seed:                    42,
        num_threads:             Some(1),
        snapshot_interval_ticks: 0,
    }
}

/// Open ground, loaded guns.
struct Open;

impl WorldQuery for Open {
    fn line_of_sight(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }

    fn weapon(&self, _agent: AgentId) -> WeaponStatus {
        WeaponStatus::loaded(30, 90)
    }
}

/// ```text
///   A [0,10] ── B [10,20]     (y 0..10, z 0)
/// ```
fn open_map() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    let a = b.add_node(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 0.0, NodeFlags::empty());
    let bb = b.add_node(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0), 0.0, NodeFlags::empty());
    b.connect_both(a, bb);
    b.build()
}

/// Two Red bots in area A, out of each other's way.
fn red_pair() -> AgentStore {
    AgentStoreBuilder::new()
        .spawn(Team::Red, Vec3::new(2.0, 2.0, 0.0), 0.0)
        .spawn(Team::Red, Vec3::new(2.0, 8.0, 0.0), 0.0)
        .build()
}

type TestSim = Sim<AStarRouter, Open, KinematicSink>;

fn sim(total_ticks: u64, agents: AgentStore) -> TestSim {
    SimBuilder::new(test_config(total_ticks), agents, AStarRouter::default(), Open, KinematicSink::default())
        .graph(open_map())
        .build()
        .unwrap()
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use bot_behavior::BotProfile;
    use bot_core::ObjectiveId;
    use bot_objective::{GameEvent, ObjectiveKind};

    use crate::SimError;

    #[test]
    fn builds_one_bot_per_body() {
        let sim = sim(10, red_pair());
        assert_eq!(sim.bots.len(), 2);
        assert_eq!(sim.bot(AgentId(1)).map(|b| b.id()), Some(AgentId(1)));
        assert!(sim.bot(AgentId(2)).is_none());
        assert_eq!(sim.clock.current_tick, Tick(0));
    }

    #[test]
    fn profile_count_mismatch_errors() {
        let result = SimBuilder::new(test_config(10), red_pair(), AStarRouter::default(), Open, KinematicSink::default())
            .profiles(vec![BotProfile::default()])
            .build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn profiles_reach_their_bots() {
        let profiles = vec![BotProfile::default().with_skill(0.1), BotProfile::default().with_skill(0.9)];
        let sim = SimBuilder::new(test_config(10), red_pair(), AStarRouter::default(), Open, KinematicSink::default())
            .profiles(profiles)
            .build()
            .unwrap();
        assert_eq!(sim.bots[0].brain().profile.skill, 0.1);
        assert_eq!(sim.bots[1].brain().profile.skill, 0.9);
    }

    #[test]
    fn non_positive_tick_interval_errors() {
        let mut config = test_config(10);
        config.tick_interval_secs = 0.0;
        let result = SimBuilder::new(config, red_pair(), AStarRouter::default(), Open, KinematicSink::default()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn setup_events_populate_objectives() {
        let spawn = GameEvent::ObjectiveSpawned {
            id:       ObjectiveId(0),
            kind:     ObjectiveKind::CapturePoint,
            position: Vec3::new(15.0, 5.0, 0.0),
            owner:    Team::Blue,
        };
        let sim = SimBuilder::new(test_config(10), red_pair(), AStarRouter::default(), Open, KinematicSink::default())
            .setup_events(vec![spawn])
            .build()
            .unwrap();
        assert_eq!(sim.objectives.len(), 1);
    }

    #[test]
    fn rejected_setup_event_fails_the_build() {
        let bad = GameEvent::Locked { id: ObjectiveId(3), locked: true };
        let result = SimBuilder::new(test_config(10), red_pair(), AStarRouter::default(), Open, KinematicSink::default())
            .setup_events(vec![bad])
            .build();
        assert!(matches!(result, Err(SimError::Objective(_))));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use bot_behavior::{BotCommand, StateTag};
    use bot_core::{NodeId, ObjectiveId};
    use bot_objective::{GameEvent, ObjectiveKind};

    use crate::{NoopObserver, SimObserver, TickSummary};

    #[derive(Default)]
    struct Counter {
        starts:    u64,
        ends:      u64,
        events:    usize,
        commands:  Vec<(Tick, AgentId)>,
        snapshots: Vec<Tick>,
        last:      Option<TickSummary>,
        finished:  Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }

        fn on_event(&mut self, _tick: Tick, _event: &GameEvent) {
            self.events += 1;
        }

        fn on_command(&mut self, tick: Tick, agent: AgentId, _command: &BotCommand) {
            self.commands.push((tick, agent));
        }

        fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
            self.ends += 1;
            self.last = Some(summary.clone());
        }

        fn on_snapshot(&mut self, tick: Tick, _agents: &AgentStore, _bots: &[bot_behavior::Bot]) {
            self.snapshots.push(tick);
        }

        fn on_sim_end(&mut self, final_tick: Tick) {
            self.finished = Some(final_tick);
        }
    }

    #[test]
    fn run_stops_at_end_tick() {
        let mut sim = sim(5, red_pair());
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 5);
        assert_eq!(obs.ends, 5);
        assert_eq!(obs.finished, Some(Tick(5)));
        assert_eq!(sim.clock.current_tick, Tick(5));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = sim(2, red_pair());
        sim.run_ticks(4, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(4));
    }

    #[test]
    fn commands_arrive_in_agent_order() {
        let mut sim = sim(3, red_pair());
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        let expected: Vec<(Tick, AgentId)> = (0..3)
            .flat_map(|t| [(Tick(t), AgentId(0)), (Tick(t), AgentId(1))])
            .collect();
        assert_eq!(obs.commands, expected);
    }

    #[test]
    fn snapshots_follow_interval() {
        let mut sim = sim(5, red_pair());
        sim.config.snapshot_interval_ticks = 2;
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(2), Tick(4)]);
    }

    #[test]
    fn kill_event_silences_the_victim() {
        let mut sim = sim(3, red_pair());
        sim.push_event(Tick(1), GameEvent::Kill { victim: AgentId(1), killer: None });
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();

        assert!(!sim.agents.alive[1]);
        assert_eq!(obs.events, 1);
        assert_eq!(obs.commands.iter().filter(|(_, a)| *a == AgentId(1)).count(), 1);
        assert_eq!(obs.last.map(|s| s.alive), Some(1));
    }

    #[test]
    fn damage_event_hurts_body_and_morale() {
        let mut sim = sim(1, red_pair());
        let attacker = sim.agents.handle(AgentId(1));
        sim.push_event_now(GameEvent::Damage {
            victim:   AgentId(0),
            attacker: Some(attacker),
            amount:   30.0,
            from:     Vec3::new(2.0, 8.0, 0.0),
        });
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.agents.health[0], 70.0);
        assert!(sim.agents.alive[0]);
        assert!(sim.bots[0].brain().morale < 0.0);
    }

    #[test]
    fn rejected_feed_event_is_skipped() {
        let mut sim = sim(2, red_pair());
        sim.push_event_now(GameEvent::Locked { id: ObjectiveId(7), locked: true });
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.ends, 2);
        assert!(sim.events.is_empty());
    }

    #[test]
    fn bot_walks_toward_enemy_capture_point() {
        let agents = AgentStoreBuilder::new().spawn(Team::Red, Vec3::new(2.0, 5.0, 0.0), 0.0).build();
        let mut sim = sim(30, agents);
        sim.push_event_now(GameEvent::ObjectiveSpawned {
            id:       ObjectiveId(0),
            kind:     ObjectiveKind::CapturePoint,
            position: Vec3::new(15.0, 5.0, 0.0),
            owner:    Team::Blue,
        });
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();

        assert!(sim.agents.position[0].x > 5.0);
        let summary = obs.last.unwrap();
        assert_eq!(summary.alive, 1);
        assert_eq!(summary.in_state(StateTag::MoveTo) + summary.in_state(StateTag::CaptureObjective), 1);
    }

    #[test]
    fn blocked_area_fails_the_move() {
        let agents = AgentStoreBuilder::new().spawn(Team::Red, Vec3::new(2.0, 5.0, 0.0), 0.0).build();
        let mut sim = sim(30, agents);
        sim.push_event_now(GameEvent::ObjectiveSpawned {
            id:       ObjectiveId(0),
            kind:     ObjectiveKind::CapturePoint,
            position: Vec3::new(15.0, 5.0, 0.0),
            owner:    Team::Blue,
        });
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        let bot = sim.bot(AgentId(0)).unwrap();
        assert_eq!(bot.state(), Some(StateTag::MoveTo));
        assert!(bot.brain().mover.has_path());

        // Area B holds the capture point.
        sim.push_event_now(GameEvent::NodeBlocked { node: NodeId(1) });
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let bot = sim.bot(AgentId(0)).unwrap();
        assert_eq!(bot.state(), Some(StateTag::Idle));
        assert!(!bot.brain().mover.has_path());
    }

    #[test]
    fn blocking_an_unused_area_changes_nothing() {
        let agents = AgentStoreBuilder::new().spawn(Team::Red, Vec3::new(2.0, 5.0, 0.0), 0.0).build();
        let mut sim = sim(30, agents);
        sim.push_event_now(GameEvent::ObjectiveSpawned {
            id:       ObjectiveId(0),
            kind:     ObjectiveKind::CapturePoint,
            position: Vec3::new(8.0, 5.0, 0.0),
            owner:    Team::Blue,
        });
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        sim.push_event_now(GameEvent::NodeBlocked { node: NodeId(1) });
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let bot = sim.bot(AgentId(0)).unwrap();
        assert_eq!(bot.state(), Some(StateTag::MoveTo));
        assert!(bot.brain().mover.has_path());
    }

    #[test]
    fn same_seed_same_match() {
        let mut a = sim(40, red_pair());
        let mut b = sim(40, red_pair());
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        assert_eq!(a.agents.position, b.agents.position);
        assert_eq!(a.agents.yaw, b.agents.yaw);
    }
}

// ── Locomotion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod locomotion_tests {
    use super::*;
    use bot_behavior::{BotCommand, WeaponCommand};
    use bot_mobility::{MoveCommand, MoveSpeed};

    use crate::{LocomotionSink, NoopObserver};

    #[test]
    fn kinematic_sink_moves_and_turns() {
        let mut agents = red_pair();
        let command = BotCommand {
            movement: MoveCommand::toward(Vec3::ZERO, Vec3::X, MoveSpeed::Run).looking_at(Vec3::new(2.0, 12.0, 1.6)),
            weapon:   WeaponCommand { fire: true, reload: false },
        };
        let mut sink = KinematicSink::default();
        sink.apply(AgentId(0), &command, &mut agents, 1.0);

        assert_eq!(agents.position[0], Vec3::new(7.0, 2.0, 0.0));
        assert!((agents.yaw[0] - 90.0).abs() < 1e-3);
        assert!(agents.is_firing[0]);
        assert!(agents.is_sprinting[0]);
    }

    #[test]
    fn kinematic_sink_climbs_ladders() {
        let mut agents = red_pair();
        let command = BotCommand {
            movement: MoveCommand { climb: 1.0, ..MoveCommand::stop() },
            weapon:   WeaponCommand::default(),
        };
        KinematicSink::default().apply(AgentId(1), &command, &mut agents, 0.5);
        assert_eq!(agents.position[1].z, 1.0);
        assert!(agents.on_ladder[1]);
        assert!(!agents.on_ground[1]);
    }

    #[test]
    fn kinematic_sink_ignores_the_dead() {
        let mut agents = red_pair();
        agents.kill(AgentId(0));
        let command = BotCommand {
            movement: MoveCommand::toward(Vec3::ZERO, Vec3::X, MoveSpeed::Run),
            weapon:   WeaponCommand::default(),
        };
        KinematicSink::default().apply(AgentId(0), &command, &mut agents, 1.0);
        assert_eq!(agents.position[0], Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let sink = |agent: AgentId, _: &BotCommand, _: &mut AgentStore, _: f32| seen.push(agent);
            let mut sim = SimBuilder::new(test_config(2), red_pair(), AStarRouter::default(), Open, sink)
                .graph(open_map())
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).unwrap();
        }
        assert_eq!(seen, vec![AgentId(0), AgentId(1), AgentId(0), AgentId(1)]);
    }
}
