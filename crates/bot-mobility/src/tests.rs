//! Unit tests for bot-mobility.
//!
//! Path-following tests drive a kinematic walker: it applies each
//! `MoveCommand` literally (fixed walk/run speeds, instant turning, floor
//! snapping) and clings to the map's single ladder while climb input is
//! held.

#[cfg(test)]
mod fixtures {
    use bot_core::geo::{horizontal_distance, yaw_towards};
    use bot_core::{NodeId, Vec2, Vec3};
    use bot_nav::{LadderLink, NavGraph, NavGraphBuilder, NodeFlags};

    use crate::{BodyState, MoveCommand, MoveSpeed};

    pub const DT: f32 = 0.1;

    pub fn area(b: &mut NavGraphBuilder, x0: f32, x1: f32, z: f32, flags: NodeFlags) -> NodeId {
        b.add_node(Vec2::new(x0, 0.0), Vec2::new(x1, 10.0), z, flags)
    }

    /// ```text
    ///   A (z 0) ─walk─ B (z 0) ═ladder═ C (z 4) ─walk─ D (z 4)
    /// ```
    pub fn ladder_map() -> (NavGraph, [NodeId; 4]) {
        let mut b = NavGraphBuilder::new();
        let a = area(&mut b, 0.0, 10.0, 0.0, NodeFlags::empty());
        let bb = area(&mut b, 10.0, 20.0, 0.0, NodeFlags::empty());
        let c = area(&mut b, 20.0, 30.0, 4.0, NodeFlags::empty());
        let d = area(&mut b, 30.0, 40.0, 4.0, NodeFlags::empty());
        b.connect_both(a, bb);
        b.connect_both(c, d);
        b.add_ladder(
            bb,
            c,
            Vec3::new(19.5, 5.0, 0.0),
            Vec3::new(20.5, 5.0, 4.0),
            Vec3::new(-1.0, 0.0, 0.0),
            1.0,
        );
        (b.build(), [a, bb, c, d])
    }

    pub struct Walker {
        pub body:      BodyState,
        pub ladder:    Option<LadderLink>,
        pub can_climb: bool,
    }

    impl Walker {
        pub fn at(graph: &NavGraph, pos: Vec3) -> Self {
            Self {
                body: BodyState { position: pos, yaw: 0.0, on_ground: true, on_ladder: false },
                ladder: graph.ladders.first().copied(),
                can_climb: true,
            }
        }

        pub fn apply(&mut self, graph: &NavGraph, cmd: &MoveCommand) {
            let pos = self.body.position;
            if let Some(look) = cmd.look_at {
                if horizontal_distance(pos, look) > 1e-3 {
                    self.body.yaw = yaw_towards(pos, look);
                }
            }

            if let Some(ladder) = self.ladder.filter(|_| self.can_climb && cmd.climb != 0.0) {
                let mid = ladder.bottom.lerp(ladder.top, 0.5);
                if horizontal_distance(pos, mid) <= 1.5 {
                    let z = (pos.z + cmd.climb * 3.0 * DT).clamp(ladder.bottom.z, ladder.top.z);
                    let t = (z - ladder.bottom.z) / (ladder.top.z - ladder.bottom.z);
                    let on = ladder.bottom.lerp(ladder.top, t);
                    self.body.position = Vec3::new(on.x, on.y, z);
                    self.body.on_ladder = true;
                    self.body.on_ground = false;
                    return;
                }
            }

            let speed = match cmd.speed {
                MoveSpeed::Stop => 0.0,
                MoveSpeed::Walk => 3.0,
                MoveSpeed::Run  => 6.0,
            };
            let mut next = pos + cmd.direction * speed * DT;
            match graph.ground_height(next) {
                Some(g) if g >= next.z - 0.5 => next.z = g,
                Some(g) => next.z = (next.z - 1.0).max(g),
                None => {}
            }
            self.body.position = next;
            self.body.on_ladder = false;
            self.body.on_ground = true;
        }
    }
}

// ── MoveCommand ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod command {
    use bot_core::Vec3;
    use crate::{MoveCommand, MoveSpeed};

    #[test]
    fn local_axes_follow_view() {
        let cmd = MoveCommand::toward(Vec3::ZERO, Vec3::new(0.0, 5.0, 3.0), MoveSpeed::Run);
        assert_eq!(cmd.direction, Vec3::Y);
        let (fwd, left) = cmd.local_axes(90.0);
        assert!((fwd - 1.0).abs() < 1e-5 && left.abs() < 1e-5);

        let strafe = MoveCommand::toward(Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0), MoveSpeed::Walk);
        let (fwd, left) = strafe.local_axes(90.0);
        assert!(fwd.abs() < 1e-5 && (left - 1.0).abs() < 1e-5);
    }

    #[test]
    fn stopped_command_has_no_input() {
        let cmd = MoveCommand::stop();
        assert!(!cmd.is_moving());
        assert_eq!(cmd.local_axes(0.0), (0.0, 0.0));
        assert!(cmd.look_at.is_none());
    }
}

// ── Stuck detection ───────────────────────────────────────────────────────────

#[cfg(test)]
mod stuck {
    use bot_core::Vec3;
    use crate::{MobilityConfig, StuckMonitor};
    use super::fixtures::DT;

    #[test]
    fn stuck_then_cleared_by_displacement() {
        let cfg = MobilityConfig::default();
        let mut m = StuckMonitor::new();

        let mut starts = 0;
        for n in 0..20 {
            if m.update(&cfg, n as f32 * DT, Vec3::new(1.0, 1.0, 0.0)) {
                starts += 1;
            }
        }
        assert_eq!(starts, 1);
        assert!(m.is_stuck());
        assert_eq!(m.stuck_origin(), Some(Vec3::new(1.0, 1.0, 0.0)));

        // Within the reset distance: still stuck.
        m.update(&cfg, 2.0, Vec3::new(2.0, 1.0, 0.0));
        assert!(m.is_stuck());

        m.update(&cfg, 2.1, Vec3::new(3.0, 1.0, 0.0));
        assert!(!m.is_stuck());
        assert_eq!(m.episodes(), 1);
        assert_eq!(m.stuck_duration(2.1), 0.0);
    }

    #[test]
    fn steady_motion_is_never_stuck() {
        let cfg = MobilityConfig::default();
        let mut m = StuckMonitor::new();
        for n in 0..50 {
            let t = n as f32 * DT;
            assert!(!m.update(&cfg, t, Vec3::new(t, 0.0, 0.0)));
        }
        assert_eq!(m.episodes(), 0);
    }

    #[test]
    fn short_pause_is_not_stuck() {
        let cfg = MobilityConfig::default();
        let mut m = StuckMonitor::new();
        for n in 0..5 {
            m.update(&cfg, n as f32 * DT, Vec3::ZERO);
        }
        assert!(!m.is_stuck());
    }
}

// ── Path following ────────────────────────────────────────────────────────────

#[cfg(test)]
mod following {
    use bot_core::{AgentId, AgentRng, Vec3};
    use bot_nav::{AStarRouter, LadderMode, NavGraphBuilder, NodeFlags, RouteMode, Traversal};

    use crate::{
        LadderPhase, MobilityConfig, MobilityError, MoveContext, ObstacleProbe, OpenGround, PathFailure,
        PathFollower, PathStatus,
    };
    use super::fixtures::{area, ladder_map, Walker, DT};

    const START: Vec3 = Vec3::new(5.0, 5.0, 0.0);
    const GOAL: Vec3 = Vec3::new(35.0, 5.0, 4.0);

    fn rng() -> AgentRng {
        AgentRng::new(7, AgentId(0))
    }

    #[test]
    fn three_hop_ladder_path_is_followed_to_the_end() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut rng = rng();
        let mut follower = PathFollower::new();
        let mut walker = Walker::at(&graph, START);

        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, START, GOAL, RouteMode::Fastest).unwrap();

        let path = follower.path().unwrap();
        assert!(path.is_complete());
        assert!(path.is_connected(&graph));
        let ladders: Vec<_> = path.waypoints().iter().filter_map(|w| w.how.ladder()).collect();
        assert_eq!(ladders.len(), 1);
        assert_eq!(ladders[0].1, LadderMode::Ascend);
        let before_ladder = path.waypoints().iter().position(|w| w.how.ladder().is_some()).unwrap();
        assert_eq!(path.waypoints()[before_ladder - 1].how, Traversal::Walk);

        let mut statuses = Vec::new();
        let mut saw_climb = false;
        for n in 0..400 {
            let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: n as f32 * DT };
            let status = follower.update(&cfg, &ctx, &walker.body, &mut rng);
            saw_climb |= follower.ladder_phase() == Some(LadderPhase::Traverse);
            statuses.push(status);
            if status != PathStatus::Progressing {
                break;
            }
            walker.apply(&graph, &follower.command());
        }

        assert_eq!(statuses[0], PathStatus::Progressing);
        assert_eq!(statuses.last(), Some(&PathStatus::ReachedEnd));
        assert!(saw_climb, "never climbed the ladder");
        assert!(walker.body.position.distance(GOAL) < cfg.waypoint_radius + 0.1);
        assert!(!follower.has_path());
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 50.0 };
        assert_eq!(
            follower.update(&cfg, &ctx, &walker.body, &mut rng),
            PathStatus::Failed(PathFailure::NoPath)
        );
    }

    #[test]
    fn repath_respects_cool_down() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut follower = PathFollower::new();

        let at = |now| MoveContext { graph: &graph, router: &router, probe: &OpenGround, now };
        follower.repath(&cfg, &at(0.0), START, GOAL, RouteMode::Fastest).unwrap();
        let err = follower.repath(&cfg, &at(0.5), START, GOAL, RouteMode::Safest).unwrap_err();
        assert!(matches!(err, MobilityError::Throttled { .. }));
        assert_eq!(follower.route_mode(), RouteMode::Fastest);
        follower.repath(&cfg, &at(1.5), START, GOAL, RouteMode::Safest).unwrap();
        assert_eq!(follower.route_mode(), RouteMode::Safest);
    }

    #[test]
    fn cool_down_outlives_the_path() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut follower = PathFollower::new();

        let at = |now| MoveContext { graph: &graph, router: &router, probe: &OpenGround, now };
        follower.repath(&cfg, &at(0.0), START, GOAL, RouteMode::Fastest).unwrap();
        follower.destroy_path();
        assert!(!follower.can_repath(0.5));
        assert!(matches!(
            follower.repath(&cfg, &at(0.5), START, GOAL, RouteMode::Fastest),
            Err(MobilityError::Throttled { .. })
        ));
        assert!(!follower.has_path());

        // The unthrottled entry point still plans.
        follower.compute_path(&cfg, &at(0.5), START, GOAL, RouteMode::Fastest).unwrap();
        assert!(follower.has_path());
        assert!(follower.can_repath(1.5));
    }

    #[test]
    fn blocked_node_fails_the_path() {
        let (graph, [_, _, c, _]) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut follower = PathFollower::new();
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, START, GOAL, RouteMode::Fastest).unwrap();

        assert!(follower.on_node_blocked(c));
        let body = Walker::at(&graph, START).body;
        let status = follower.update(&cfg, &ctx, &body, &mut rng());
        assert_eq!(status, PathStatus::Failed(PathFailure::Blocked));
        assert!(!follower.has_path());
        assert_eq!(follower.update(&cfg, &ctx, &body, &mut rng()), PathStatus::Failed(PathFailure::NoPath));
    }

    #[test]
    fn falling_below_the_path_fails() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut follower = PathFollower::new();
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, START, GOAL, RouteMode::Fastest).unwrap();

        let mut body = Walker::at(&graph, START).body;
        body.position.z = -10.0;
        let status = follower.update(&cfg, &ctx, &body, &mut rng());
        assert_eq!(status, PathStatus::Failed(PathFailure::Fell));
    }

    #[test]
    fn motionless_body_times_out_after_recovering() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut rng = rng();
        let mut follower = PathFollower::new();
        let body = Walker::at(&graph, START).body;
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, START, GOAL, RouteMode::Fastest).unwrap();

        let mut saw_stuck = false;
        let mut last = PathStatus::Progressing;
        for n in 0..80 {
            let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: n as f32 * DT };
            last = follower.update(&cfg, &ctx, &body, &mut rng);
            saw_stuck |= follower.is_stuck();
            if last != PathStatus::Progressing {
                break;
            }
        }
        assert!(saw_stuck);
        assert_eq!(last, PathStatus::Failed(PathFailure::Timeout));
    }

    #[test]
    fn repeated_stuck_episodes_exhaust_retries() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig { progress_timeout_secs: 100.0, ..MobilityConfig::default() };
        let mut rng = rng();
        let mut follower = PathFollower::new();
        let origin = Vec3::new(5.0, 1.0, 0.0);
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, origin, GOAL, RouteMode::Fastest).unwrap();

        let mut body = Walker::at(&graph, origin).body;
        let mut last = PathStatus::Progressing;
        for n in 0..80 {
            // Teleport 2 units every 1.2 s, otherwise stand still.
            body.position.y = 1.0 + 2.0 * (n / 12) as f32;
            let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: n as f32 * DT };
            last = follower.update(&cfg, &ctx, &body, &mut rng);
            if last != PathStatus::Progressing {
                break;
            }
        }
        assert_eq!(last, PathStatus::Failed(PathFailure::StuckRetriesExhausted));
    }

    #[test]
    fn unclimbable_ladder_aborts_with_recovery_jump() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut rng = rng();
        let mut follower = PathFollower::new();
        let mut walker = Walker::at(&graph, START);
        walker.can_climb = false;
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, START, GOAL, RouteMode::Fastest).unwrap();

        let mut last = PathStatus::Progressing;
        for n in 0..200 {
            let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: n as f32 * DT };
            last = follower.update(&cfg, &ctx, &walker.body, &mut rng);
            if last != PathStatus::Progressing {
                break;
            }
            walker.apply(&graph, &follower.command());
        }
        assert_eq!(last, PathStatus::Failed(PathFailure::LadderAborted));
        assert!(follower.command().jump);
        assert!(!follower.has_path());
    }

    #[test]
    fn crouches_ahead_of_crouch_area() {
        let mut b = NavGraphBuilder::new();
        let open = area(&mut b, 0.0, 10.0, 0.0, NodeFlags::empty());
        let low = area(&mut b, 10.0, 20.0, 0.0, NodeFlags::CROUCH);
        b.connect_both(open, low);
        let graph = b.build();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut follower = PathFollower::new();

        let from = Vec3::new(2.0, 5.0, 0.0);
        let ctx = MoveContext { graph: &graph, router: &router, probe: &OpenGround, now: 0.0 };
        follower.compute_path(&cfg, &ctx, from, Vec3::new(15.0, 5.0, 0.0), RouteMode::Fastest).unwrap();
        let body = Walker::at(&graph, from).body;
        follower.update(&cfg, &ctx, &body, &mut rng());
        assert!(!follower.command().crouch);

        let near = Walker::at(&graph, Vec3::new(9.0, 5.0, 0.0)).body;
        follower.update(&cfg, &ctx, &near, &mut rng());
        assert!(follower.command().crouch);
    }

    struct WallOnLeft;

    impl ObstacleProbe for WallOnLeft {
        fn probe(&self, _from: Vec3, dir: Vec3, _max: f32) -> Option<f32> {
            (dir.y > 0.1).then_some(0.8)
        }
    }

    #[test]
    fn feelers_bend_away_from_walls() {
        let (graph, _) = ladder_map();
        let router = AStarRouter::default();
        let cfg = MobilityConfig::default();
        let mut follower = PathFollower::new();
        let ctx = MoveContext { graph: &graph, router: &router, probe: &WallOnLeft, now: 0.0 };
        follower.compute_path(&cfg, &ctx, START, GOAL, RouteMode::Fastest).unwrap();

        let body = Walker::at(&graph, START).body;
        assert_eq!(follower.update(&cfg, &ctx, &body, &mut rng()), PathStatus::Progressing);
        let dir = follower.command().direction;
        assert!(dir.x > 0.0);
        assert!(dir.y < 0.0, "expected to veer right, got {dir:?}");
    }
}
