//! `Brain` — everything one bot owns besides its behavior stack.
//!
//! Actions and states read the world through [`BotContext`] and write only
//! here: perception, aim, the path follower, tactical scalars and the
//! command being assembled for this tick.

use bot_core::{AgentId, AgentRng, Team, Vec3};
use bot_mobility::{BodyState, MobilityError, MoveCommand, MoveContext, PathFollower, PathStatus};
use bot_nav::RouteMode;
use bot_perception::{AimModel, Perception};

use crate::command::BotCommand;
use crate::config::BotConfig;
use crate::context::BotContext;
use crate::profile::BotProfile;
use crate::world::WorldView;
use crate::BehaviorResult;

/// What the bot is currently trying to achieve, for observers and logs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Task {
    #[default]
    None,
    Roam,
    Fight,
    Retreat,
    Reload,
    TakeCover,
    Escort,
    Investigate,
    Fetch,
    Capture,
    Defend,
    Carry,
}

#[derive(Clone, Debug)]
pub struct Brain {
    pub me:         AgentId,
    pub profile:    BotProfile,
    pub rng:        AgentRng,
    pub perception: Perception,
    pub aim:        AimModel,
    pub mover:      PathFollower,
    pub task:       Task,
    /// `[-1, 1]`; kills raise it, wounds and nearby team losses lower it.
    pub morale:     f32,
    /// This tick's answer to "attack the recognized enemy?".
    pub engage:     bool,
    /// Where to look when no state sets a view target.
    pub look_hint:  Option<Vec3>,
    /// The command being assembled this tick.
    pub command:    BotCommand,
    /// Body generation seen at the last update; a change means respawn.
    pub(crate) generation: Option<u32>,
}

impl Brain {
    pub fn new(me: AgentId, profile: BotProfile, seed: u64, config: &BotConfig, tick_interval_secs: f32) -> Self {
        let perception = Perception::new(&config.perception, profile.skill, tick_interval_secs);
        Self {
            me,
            rng: AgentRng::new(seed, me),
            perception,
            aim: AimModel::new(),
            mover: PathFollower::new(),
            task: Task::None,
            morale: 0.0,
            engage: false,
            look_hint: None,
            command: BotCommand::idle(),
            generation: None,
            profile,
        }
    }

    // ── Body ──────────────────────────────────────────────────────────────

    pub fn team(&self, ctx: &BotContext<'_>) -> Team {
        ctx.agents.team[self.me.index()]
    }

    pub fn position(&self, ctx: &BotContext<'_>) -> Vec3 {
        ctx.agents.position[self.me.index()]
    }

    pub fn eye(&self, ctx: &BotContext<'_>) -> Vec3 {
        ctx.agents.eye_position(self.me)
    }

    pub fn body(&self, ctx: &BotContext<'_>) -> BodyState {
        BodyState::of(ctx.agents, self.me)
    }

    /// Low on health for this bot's temperament and mood.
    pub fn is_wounded(&self, ctx: &BotContext<'_>) -> bool {
        let cfg = &ctx.config.behavior;
        let threshold = cfg.retreat_health_ratio * (1.5 - self.profile.aggression) * (1.0 - 0.25 * self.morale);
        ctx.agents.health_ratio(self.me) < threshold
    }

    pub fn adjust_morale(&mut self, delta: f32) {
        self.morale = (self.morale + delta).clamp(-1.0, 1.0);
    }

    // ── Movement ──────────────────────────────────────────────────────────

    pub fn route_mode(&self) -> RouteMode {
        if self.profile.safe_routes { RouteMode::Safest } else { RouteMode::Fastest }
    }

    /// Plan a path from the body to `goal` with the profile's route mode.
    pub fn path_to(&mut self, ctx: &BotContext<'_>, goal: Vec3) -> BehaviorResult<()> {
        let mode = self.route_mode();
        self.path_to_with(ctx, goal, mode)
    }

    pub fn path_to_with(&mut self, ctx: &BotContext<'_>, goal: Vec3, mode: RouteMode) -> BehaviorResult<()> {
        let view = WorldView(ctx.world);
        let move_ctx = MoveContext { graph: ctx.graph, router: ctx.router, probe: &view, now: ctx.now };
        let from = self.position(ctx);
        self.mover.compute_path(&ctx.config.mobility, &move_ctx, from, goal, mode)?;
        Ok(())
    }

    /// Re-plan toward `goal` unless the follower's repath cool-down is still
    /// running.  `Ok(false)` means the request was throttled and the current
    /// path, if any, is untouched.
    pub fn repath_to(&mut self, ctx: &BotContext<'_>, goal: Vec3) -> BehaviorResult<bool> {
        let view = WorldView(ctx.world);
        let move_ctx = MoveContext { graph: ctx.graph, router: ctx.router, probe: &view, now: ctx.now };
        let from = self.position(ctx);
        let mode = self.route_mode();
        match self.mover.repath(&ctx.config.mobility, &move_ctx, from, goal, mode) {
            Ok(()) => Ok(true),
            Err(MobilityError::Throttled { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Steer along the current path and adopt the resulting movement.
    pub fn follow(&mut self, ctx: &BotContext<'_>) -> PathStatus {
        let view = WorldView(ctx.world);
        let move_ctx = MoveContext { graph: ctx.graph, router: ctx.router, probe: &view, now: ctx.now };
        let body = self.body(ctx);
        let status = self.mover.update(&ctx.config.mobility, &move_ctx, &body, &mut self.rng);
        self.command.movement = self.mover.command();
        status
    }

    pub fn stop(&mut self) {
        self.command.movement = MoveCommand::stop();
    }

    /// Forget per-life state (respawn, new round).
    pub fn reset(&mut self) {
        self.perception.reset();
        self.aim.reset();
        self.mover = PathFollower::new();
        self.task = Task::None;
        self.morale = 0.0;
        self.engage = false;
        self.look_hint = None;
    }
}
