//! Unit tests for bot-agent.

#[cfg(test)]
mod store {
    use bot_core::{AgentId, Team, Vec3};
    use crate::{AgentStoreBuilder, EYE_HEIGHT};

    fn two_teams() -> crate::AgentStore {
        AgentStoreBuilder::new()
            .spawn(Team::Red, Vec3::ZERO, 0.0)
            .spawn(Team::Red, Vec3::new(3.0, 0.0, 0.0), 0.0)
            .spawn(Team::Blue, Vec3::new(30.0, 0.0, 0.0), 180.0)
            .build()
    }

    #[test]
    fn builder_assigns_sequential_ids() {
        let store = two_teams();
        assert_eq!(store.count, 3);
        assert_eq!(store.agent_ids().collect::<Vec<_>>(), vec![AgentId(0), AgentId(1), AgentId(2)]);
        assert_eq!(store.team[2], Team::Blue);
        assert_eq!(store.yaw[2], 180.0);
        assert!(store.alive.iter().all(|&a| a));
    }

    #[test]
    fn empty_builder() {
        let store = AgentStoreBuilder::new().build();
        assert!(store.is_empty());
        assert_eq!(store.agent_ids().count(), 0);
    }

    #[test]
    fn handle_stops_resolving_after_death() {
        let mut store = two_teams();
        let h = store.handle(AgentId(2));
        assert_eq!(store.resolve(h), Some(AgentId(2)));
        store.kill(AgentId(2));
        assert_eq!(store.resolve(h), None);
        store.respawn(AgentId(2), Vec3::ZERO, 0.0);
        assert_eq!(store.resolve(h), None, "old handle must not see the respawned body");
        assert!(store.is_valid(store.handle(AgentId(2))));
    }

    #[test]
    fn out_of_range_handle_is_invalid() {
        let store = two_teams();
        let h = bot_core::AgentHandle::new(AgentId(99), 0);
        assert_eq!(store.resolve(h), None);
    }

    #[test]
    fn damage_kills_at_zero() {
        let mut store = two_teams();
        assert!(!store.apply_damage(AgentId(0), 40.0));
        assert!((store.health_ratio(AgentId(0)) - 0.6).abs() < 1e-6);
        assert!(store.apply_damage(AgentId(0), 80.0));
        assert!(!store.is_alive(AgentId(0)));
        assert!(!store.apply_damage(AgentId(0), 10.0), "corpses cannot die twice");
    }

    #[test]
    fn proximity_and_team_scans_skip_dead() {
        let mut store = two_teams();
        let near: Vec<_> = store.nearby(Vec3::ZERO, 5.0, AgentId(0)).collect();
        assert_eq!(near, vec![AgentId(1)]);
        store.kill(AgentId(1));
        assert_eq!(store.nearby(Vec3::ZERO, 5.0, AgentId(0)).count(), 0);
        assert_eq!(store.members(Team::Red).collect::<Vec<_>>(), vec![AgentId(0)]);
    }

    #[test]
    fn eye_height_tracks_crouch() {
        let mut store = two_teams();
        assert_eq!(store.eye_position(AgentId(0)).z, EYE_HEIGHT);
        store.is_crouching[0] = true;
        assert!(store.eye_position(AgentId(0)).z < EYE_HEIGHT);
    }

    #[test]
    fn speed_ignores_vertical_motion() {
        let mut store = two_teams();
        store.velocity[0] = Vec3::new(3.0, 4.0, -10.0);
        assert!((store.speed(AgentId(0)) - 5.0).abs() < 1e-6);
    }
}
