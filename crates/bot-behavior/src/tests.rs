//! Unit tests for bot-behavior.
//!
//! Bodies never move on their own here: tests place agents, build a
//! `BotContext` for the tick, and inspect the decisions.

#[cfg(test)]
mod fixtures {
    use bot_agent::{AgentStore, AgentStoreBuilder};
    use bot_core::{AgentId, Team, Tick, Vec2, Vec3};
    use bot_nav::{AStarRouter, NavGraph, NavGraphBuilder, NodeFlags};
    use bot_objective::{GameEvent, ObjectiveTracker};

    use crate::{BotConfig, BotContext, WeaponStatus, WorldQuery};

    pub const DT: f32 = 0.1;
    pub const ME: AgentId = AgentId(0);
    pub const ENEMY: AgentId = AgentId(1);

    pub struct World {
        pub blocked: bool,
        pub weapon:  WeaponStatus,
    }

    impl WorldQuery for World {
        fn line_of_sight(&self, _from: Vec3, _to: Vec3) -> bool {
            !self.blocked
        }

        fn weapon(&self, _agent: AgentId) -> WeaponStatus {
            self.weapon
        }
    }

    pub struct Fixture {
        pub graph:      NavGraph,
        pub router:     AStarRouter,
        pub agents:     AgentStore,
        pub objectives: ObjectiveTracker,
        pub world:      World,
        pub config:     BotConfig,
    }

    impl Fixture {
        pub fn new(graph: NavGraph, agents: AgentStore) -> Self {
            Self {
                graph,
                router: AStarRouter::default(),
                agents,
                objectives: ObjectiveTracker::new(),
                world: World { blocked: false, weapon: WeaponStatus::loaded(30, 90) },
                config: BotConfig::default(),
            }
        }

        pub fn ctx(&self, tick: u64) -> BotContext<'_> {
            BotContext {
                tick:       Tick(tick),
                now:        tick as f32 * DT,
                dt:         DT,
                graph:      &self.graph,
                router:     &self.router,
                agents:     &self.agents,
                objectives: &self.objectives,
                world:      &self.world,
                config:     &self.config,
            }
        }

        pub fn event(&mut self, event: GameEvent) {
            self.objectives.apply(0.0, &event).unwrap();
        }
    }

    /// ```text
    ///   A [0,10] ── B [10,20]     (y 0..10, z 0)
    /// ```
    pub fn open_map() -> NavGraph {
        let mut b = NavGraphBuilder::new();
        let a = b.add_node(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 0.0, NodeFlags::empty());
        let bb = b.add_node(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0), 0.0, NodeFlags::empty());
        b.connect_both(a, bb);
        b.build()
    }

    /// Red bot at (2, 5) facing +x, Blue enemy at (15, 5).
    pub fn duel(graph: NavGraph) -> Fixture {
        let agents = AgentStoreBuilder::new()
            .spawn(Team::Red, Vec3::new(2.0, 5.0, 0.0), 0.0)
            .spawn(Team::Blue, Vec3::new(15.0, 5.0, 0.0), 180.0)
            .build();
        Fixture::new(graph, agents)
    }

    /// A lone Red bot on a map with no areas: Idle has nothing to do.
    pub fn alone() -> Fixture {
        let agents = AgentStoreBuilder::new().spawn(Team::Red, Vec3::new(2.0, 5.0, 0.0), 0.0).build();
        Fixture::new(NavGraph::empty(), agents)
    }
}

// ── Behavior stack ────────────────────────────────────────────────────────────

#[cfg(test)]
mod stack {
    use bot_core::{ObjectiveId, Team, Vec3};
    use bot_objective::{GameEvent, ObjectiveKind};

    use super::fixtures::{alone, DT, ME};
    use crate::{
        ActionNode, ActionResult, BehaviorStack, Bot, BotProfile, Brain, Query, QueryAnswer, StateTag,
        WeaponStatus,
    };

    const CHAIN: [&str; 3] = ["scenario_monitor", "tactical_monitor", "behave"];

    #[test]
    fn first_update_builds_initial_children() {
        let fx = alone();
        let mut bot = Bot::new(ME, BotProfile::default(), 1, &fx.config, DT);
        assert!(!bot.stack().is_started());

        bot.update(&fx.ctx(0));
        assert_eq!(bot.stack().names(), CHAIN);
        assert_eq!(bot.state(), Some(StateTag::Idle));
    }

    #[test]
    fn finished_child_returns_control_to_parent() {
        let fx = alone();
        let mut brain = Brain::new(ME, BotProfile::default(), 1, &fx.config, DT);
        let mut stack = BehaviorStack::new();
        stack.update(&mut brain, &fx.ctx(0));

        stack.apply(1, ActionResult::Done, &mut brain, &fx.ctx(1));
        assert_eq!(stack.names(), ["scenario_monitor"]);

        // The childless root rebuilds its child on the next update.
        stack.update(&mut brain, &fx.ctx(2));
        assert_eq!(stack.names(), CHAIN);
    }

    #[test]
    fn reload_suspends_and_restores_the_chain() {
        let mut fx = alone();
        let mut bot = Bot::new(ME, BotProfile::default(), 1, &fx.config, DT);
        bot.update(&fx.ctx(0));

        fx.world.weapon = WeaponStatus { clip: 0, clip_size: 30, reserve: 60, ready: false };
        bot.update(&fx.ctx(1));
        assert_eq!(bot.stack().names(), ["scenario_monitor", "reload"]);
        assert_eq!(bot.stack().buried_at(1), 1);
        assert_eq!(bot.state(), None);

        let cmd = bot.update(&fx.ctx(2));
        assert!(cmd.weapon.reload);
        assert!(!cmd.movement.is_moving());

        fx.world.weapon = WeaponStatus::loaded(30, 30);
        bot.update(&fx.ctx(3));
        assert_eq!(bot.stack().names(), CHAIN);
        assert_eq!(bot.stack().buried_at(1), 0);
        assert_eq!(bot.state(), Some(StateTag::Idle));
    }

    #[test]
    fn abort_restarts_from_a_fresh_root() {
        let fx = alone();
        let mut brain = Brain::new(ME, BotProfile::default(), 1, &fx.config, DT);
        let mut stack = BehaviorStack::new();
        stack.update(&mut brain, &fx.ctx(0));
        stack.apply(1, ActionResult::SuspendFor(ActionNode::reload()), &mut brain, &fx.ctx(1));
        assert_eq!(stack.buried_at(1), 1);

        stack.apply(1, ActionResult::Abort("test"), &mut brain, &fx.ctx(2));
        assert_eq!(stack.names(), CHAIN);
        assert_eq!(stack.buried_at(1), 0);
        let sm = stack.state_machine().unwrap();
        assert_eq!(sm.current(), StateTag::Idle);
        assert_eq!(sm.transitions(), 1);
    }

    #[test]
    fn queries_are_answered_innermost_first() {
        let mut fx = alone();
        fx.event(GameEvent::ObjectiveSpawned {
            id: ObjectiveId(0),
            kind: ObjectiveKind::CapturePoint,
            position: Vec3::new(30.0, 5.0, 0.0),
            owner: Team::Red,
        });
        let mut brain = Brain::new(ME, BotProfile::default(), 1, &fx.config, DT);
        let mut stack = BehaviorStack::new();
        stack.update(&mut brain, &fx.ctx(0));

        let someone = fx.agents.handle(ME);
        let ctx = fx.ctx(1);
        assert_eq!(stack.query(Query::ShouldAttack(someone), &brain, &ctx), QueryAnswer::Abstain);
        assert_eq!(stack.query(Query::ShouldHurry, &brain, &ctx), QueryAnswer::Abstain);

        // Reload, now innermost, vetoes attacking.
        stack.apply(1, ActionResult::SuspendFor(ActionNode::reload()), &mut brain, &ctx);
        assert_eq!(stack.query(Query::ShouldAttack(someone), &brain, &ctx), QueryAnswer::No);

        // The root answers "hurry" once our point is contested.
        fx.event(GameEvent::CaptureProgress { id: ObjectiveId(0), team: Team::Blue, progress: 0.4 });
        let ctx = fx.ctx(2);
        assert_eq!(stack.query(Query::ShouldHurry, &brain, &ctx), QueryAnswer::Yes);
    }
}

// ── Finite state layer ────────────────────────────────────────────────────────

#[cfg(test)]
mod states {
    use bot_core::{ObjectiveId, Team, Vec3};
    use bot_objective::{GameEvent, ObjectiveKind};
    use bot_perception::PerceptionInput;

    use super::fixtures::{duel, open_map, DT, ENEMY, ME};
    use crate::{
        BotProfile, Brain, HoldMode, MoveGoal, MoveTask, Query, QueryAnswer, StateMachine, StateTag, Transition,
        WorldView,
    };

    fn spawn_objective(kind: ObjectiveKind, position: Vec3, owner: Team) -> GameEvent {
        GameEvent::ObjectiveSpawned { id: ObjectiveId(0), kind, position, owner }
    }

    #[test]
    fn reentering_a_state_resets_its_scratch_data() {
        let fx = duel(open_map());
        let ctx = fx.ctx(0);
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();
        let noise_at = Transition::Investigate(Vec3::new(15.0, 5.0, 0.0));

        sm.switch(noise_at, &mut brain, &ctx);
        let fresh = sm.scratch().investigate.clone();
        assert!(!fresh.pathed);

        sm.update(&mut brain, &ctx);
        assert_eq!(sm.current(), StateTag::InvestigateNoise);
        assert_ne!(sm.scratch().investigate, fresh);

        sm.switch(noise_at, &mut brain, &ctx);
        assert_eq!(sm.scratch().investigate, fresh);

        let go = Transition::MoveTo(MoveGoal::Position(Vec3::new(18.0, 5.0, 0.0)), MoveTask::Roam);
        sm.switch(go, &mut brain, &ctx);
        let fresh = sm.scratch().move_to.clone();
        sm.update(&mut brain, &ctx);
        assert!(!sm.scratch().move_to.needs_path);
        sm.switch(go, &mut brain, &ctx);
        assert_eq!(sm.scratch().move_to, fresh);
    }

    #[test]
    fn defended_point_lost_to_the_enemy_returns_to_idle() {
        let mut fx = duel(open_map());
        fx.event(spawn_objective(ObjectiveKind::CapturePoint, Vec3::new(2.0, 5.0, 0.0), Team::Red));
        let point = fx.objectives.handle(ObjectiveId(0)).unwrap();
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        sm.switch(Transition::Capture(point, HoldMode::Defend), &mut brain, &fx.ctx(0));
        sm.update(&mut brain, &fx.ctx(1));
        assert_eq!(sm.current(), StateTag::CaptureObjective);
        assert!(brain.command.movement.crouch);

        fx.event(GameEvent::Captured { id: ObjectiveId(0), team: Team::Blue });
        sm.update(&mut brain, &fx.ctx(2));
        assert_eq!(sm.current(), StateTag::Idle);
    }

    #[test]
    fn captured_point_ends_the_capture() {
        let mut fx = duel(open_map());
        fx.event(spawn_objective(ObjectiveKind::CapturePoint, Vec3::new(2.0, 5.0, 0.0), Team::Blue));
        let point = fx.objectives.handle(ObjectiveId(0)).unwrap();
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        sm.switch(Transition::Capture(point, HoldMode::Capture), &mut brain, &fx.ctx(0));
        sm.update(&mut brain, &fx.ctx(1));
        assert_eq!(sm.current(), StateTag::CaptureObjective);

        fx.event(GameEvent::Captured { id: ObjectiveId(0), team: Team::Red });
        sm.update(&mut brain, &fx.ctx(2));
        assert_eq!(sm.current(), StateTag::Idle);
    }

    #[test]
    fn idle_heads_for_an_enemy_point() {
        let mut fx = duel(open_map());
        fx.event(spawn_objective(ObjectiveKind::CapturePoint, Vec3::new(15.0, 5.0, 0.0), Team::Blue));
        let point = fx.objectives.handle(ObjectiveId(0)).unwrap();
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        sm.update(&mut brain, &fx.ctx(0));
        assert_eq!(sm.current(), StateTag::MoveTo);
        assert_eq!(sm.scratch().move_to.goal, MoveGoal::Objective(point));
        assert_eq!(sm.scratch().move_to.task, MoveTask::Capture);
    }

    #[test]
    fn carrier_goes_to_carry_and_avoids_distant_fights() {
        let mut fx = duel(open_map());
        fx.event(spawn_objective(ObjectiveKind::CarryItem, Vec3::new(2.0, 5.0, 0.0), Team::Unassigned));
        let me = fx.agents.handle(ME);
        fx.event(GameEvent::PickedUp { id: ObjectiveId(0), carrier: me, team: Team::Red });
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        sm.update(&mut brain, &fx.ctx(0));
        assert_eq!(sm.current(), StateTag::CarryObjective);

        let enemy = fx.agents.handle(ENEMY);
        let ctx = fx.ctx(1);
        assert_eq!(sm.query(Query::ShouldAttack(enemy), &brain, &ctx), QueryAnswer::No);
        assert_eq!(sm.query(Query::ShouldHurry, &brain, &ctx), QueryAnswer::Yes);

        fx.agents.position[ENEMY.index()] = Vec3::new(8.0, 5.0, 0.0);
        assert_eq!(sm.query(Query::ShouldAttack(enemy), &brain, &fx.ctx(2)), QueryAnswer::Yes);
    }

    fn carrier_with_destination(fx: &mut super::fixtures::Fixture, dest: Vec3) {
        fx.event(spawn_objective(ObjectiveKind::CarryItem, Vec3::new(2.0, 5.0, 0.0), Team::Unassigned));
        fx.event(GameEvent::DestinationSet { id: ObjectiveId(0), team: Team::Red, position: dest });
        let me = fx.agents.handle(ME);
        fx.event(GameEvent::PickedUp { id: ObjectiveId(0), carrier: me, team: Team::Red });
    }

    #[test]
    fn carrier_replans_at_most_once_per_cool_down() {
        let mut fx = duel(open_map());
        let first = Vec3::new(18.0, 5.0, 0.0);
        carrier_with_destination(&mut fx, first);
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        sm.update(&mut brain, &fx.ctx(0));
        assert_eq!(sm.current(), StateTag::CarryObjective);
        sm.update(&mut brain, &fx.ctx(1));
        assert_eq!(sm.scratch().carry.destination, Some(first));
        assert!(brain.mover.has_path());

        // Cool-down is 1 s from the plan at t = 0.1.
        let moved = Vec3::new(12.0, 8.0, 0.0);
        fx.event(GameEvent::DestinationSet { id: ObjectiveId(0), team: Team::Red, position: moved });
        for tick in 2..10 {
            sm.update(&mut brain, &fx.ctx(tick));
            assert_eq!(sm.current(), StateTag::CarryObjective);
            assert_eq!(sm.scratch().carry.destination, Some(first), "replanned early at tick {tick}");
        }

        sm.update(&mut brain, &fx.ctx(13));
        assert_eq!(sm.current(), StateTag::CarryObjective);
        assert_eq!(sm.scratch().carry.destination, Some(moved));
    }

    #[test]
    fn carrier_holds_on_the_destination_without_a_path() {
        let mut fx = duel(open_map());
        carrier_with_destination(&mut fx, Vec3::new(2.3, 5.0, 0.0));
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        for tick in 0..20 {
            sm.update(&mut brain, &fx.ctx(tick));
            assert_eq!(sm.current(), StateTag::CarryObjective, "left carry at tick {tick}");
        }
        assert!(sm.scratch().carry.arrived);
        assert!(!brain.mover.has_path());
        assert!(!brain.command.movement.is_moving());
    }

    #[test]
    fn attack_interrupt_resumes_the_interrupted_state() {
        let mut fx = duel(open_map());
        fx.agents.is_firing[ENEMY.index()] = true;
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        let goal = MoveGoal::Position(Vec3::new(18.0, 5.0, 0.0));
        sm.switch(Transition::MoveTo(goal, MoveTask::Roam), &mut brain, &fx.ctx(0));
        sm.update(&mut brain, &fx.ctx(0));
        assert_eq!(sm.current(), StateTag::MoveTo);

        let mut tick = 1;
        while brain.perception.recognized_enemy().is_none() {
            assert!(tick < 40, "enemy never recognized");
            let ctx = fx.ctx(tick);
            let view = WorldView(ctx.world);
            let input = PerceptionInput { me: ME, agents: ctx.agents, sight: &view, now: ctx.now, skill: 0.5 };
            brain.perception.update(&fx.config.perception, &input, &mut brain.rng);
            tick += 1;
        }

        brain.engage = true;
        sm.update(&mut brain, &fx.ctx(tick));
        assert_eq!(sm.current(), StateTag::Attack);
        assert_eq!(sm.interrupted(), Some(StateTag::MoveTo));
        assert_eq!(sm.scratch().attack.target, Some(fx.agents.handle(ENEMY)));

        fx.agents.kill(ENEMY);
        brain.engage = false;
        sm.update(&mut brain, &fx.ctx(tick + 1));
        assert_eq!(sm.current(), StateTag::MoveTo);
        assert_eq!(sm.interrupted(), None);
        assert_eq!(sm.scratch().move_to.goal, goal);
        assert!(sm.scratch().move_to.needs_path);
        assert!(brain.perception.recognized_enemy().is_none());
    }

    #[test]
    fn follower_without_a_leader_goes_idle() {
        let mut fx = duel(open_map());
        let leader = fx.agents.handle(ENEMY);
        let mut brain = Brain::new(ME, BotProfile::default(), 3, &fx.config, DT);
        let mut sm = StateMachine::new();

        sm.switch(Transition::Follow(leader), &mut brain, &fx.ctx(0));
        fx.agents.kill(ENEMY);
        sm.update(&mut brain, &fx.ctx(1));
        assert_eq!(sm.current(), StateTag::Idle);
    }
}

// ── Bot ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bot {
    use bot_core::{NoiseKind, Vec3};
    use bot_objective::GameEvent;

    use super::fixtures::{alone, DT, ME};
    use crate::{Bot, BotProfile};

    #[test]
    fn damage_turns_the_bot_toward_its_attacker() {
        let fx = alone();
        let mut bot = Bot::new(ME, BotProfile::default(), 1, &fx.config, DT);
        bot.update(&fx.ctx(0));

        let from = Vec3::new(-10.0, 5.0, 1.5);
        bot.on_event(&fx.ctx(1), &GameEvent::Damage { victim: ME, attacker: None, amount: 10.0, from });
        let cmd = bot.update(&fx.ctx(2));
        assert_eq!(cmd.movement.look_at, Some(from));
        assert!(bot.brain().morale < 0.0);
    }

    #[test]
    fn noises_reach_perception_except_our_own() {
        let fx = alone();
        let mut bot = Bot::new(ME, BotProfile::default(), 1, &fx.config, DT);
        let ctx = fx.ctx(0);
        let me = fx.agents.handle(ME);

        let own = GameEvent::Noise { source: Some(me), position: Vec3::new(2.0, 5.0, 0.0), kind: NoiseKind::Gunfire };
        bot.on_event(&ctx, &own);
        assert!(bot.brain().perception.noise.recent(&fx.config.perception, 0.0).is_none());

        let shot = GameEvent::Noise { source: None, position: Vec3::new(12.0, 5.0, 0.0), kind: NoiseKind::Gunfire };
        bot.on_event(&ctx, &shot);
        let heard = bot.brain().perception.noise.recent(&fx.config.perception, 0.0).copied();
        assert_eq!(heard.map(|n| n.position), Some(Vec3::new(12.0, 5.0, 0.0)));
    }

    #[test]
    fn dead_bots_idle_and_respawned_bots_start_over() {
        let mut fx = alone();
        let mut bot = Bot::new(ME, BotProfile::default(), 1, &fx.config, DT);
        bot.update(&fx.ctx(0));
        assert_eq!(bot.brain().generation, Some(0));

        fx.agents.kill(ME);
        let cmd = bot.update(&fx.ctx(1));
        assert!(!cmd.movement.is_moving());
        assert!(!cmd.weapon.fire);

        fx.agents.respawn(ME, Vec3::new(5.0, 5.0, 0.0), 0.0);
        bot.update(&fx.ctx(2));
        assert_eq!(bot.brain().generation, Some(1));
        assert_eq!(bot.stack().depth(), 3);
    }
}

// ── Profiles ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod profile {
    use std::io::Cursor;

    use crate::{load_profiles_reader, BehaviorError, Disposition};

    #[test]
    fn parses_rows_in_order() {
        let csv = "\
name,skill,aggression,disposition,safe_routes
Rookie,0.2,0.3,engage,false
Sniper,0.9,0.2,opportunity,true
Medic,0.5,0.1,self_defense,true
";
        let profiles = load_profiles_reader(Cursor::new(csv)).unwrap();
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0].name, "Rookie");
        assert_eq!(profiles[1].disposition, Disposition::OpportunityFire);
        assert!(profiles[1].safe_routes);
        assert_eq!(profiles[2].disposition, Disposition::SelfDefense);
        assert!((profiles[2].skill - 0.5).abs() < 1e-6);
    }

    #[test]
    fn safe_routes_column_is_optional() {
        let csv = "name,skill,aggression,disposition\nGhost,0.7,0.4,ignore\n";
        let profiles = load_profiles_reader(Cursor::new(csv)).unwrap();
        assert_eq!(profiles[0].disposition, Disposition::IgnoreEnemies);
        assert!(!profiles[0].safe_routes);
    }

    #[test]
    fn rejects_bad_values() {
        let skill = "name,skill,aggression,disposition\nOops,1.5,0.4,engage\n";
        assert!(matches!(load_profiles_reader(Cursor::new(skill)), Err(BehaviorError::Parse(_))));

        let disposition = "name,skill,aggression,disposition\nOops,0.5,0.4,berserk\n";
        assert!(matches!(load_profiles_reader(Cursor::new(disposition)), Err(BehaviorError::Parse(_))));
    }
}
