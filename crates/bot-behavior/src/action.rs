//! Action nodes run by the [`BehaviorStack`](crate::stack::BehaviorStack).
//!
//! | Node              | Role                                                        |
//! |-------------------|-------------------------------------------------------------|
//! | `ScenarioMonitor` | root; round lifecycle, "hurry" when our objective is contested |
//! | `TacticalMonitor` | retreat and reload interrupts, turning toward attackers      |
//! | `Behave`          | runs the finite state layer                                  |
//! | `Retreat`         | hide along safe routes until no enemy has been seen a while  |
//! | `Reload`          | hold still and reload                                        |

use bot_core::{AgentHandle, CountdownTimer};
use bot_objective::RoundPhase;

use crate::brain::{Brain, Task};
use crate::context::BotContext;
use crate::state::{hide, HideData, HideRequest, Next, StateMachine};

/// What an action asks of the stack after its update.
pub enum ActionResult {
    Continue,
    /// Replace this node (and everything it contains).
    ChangeTo(ActionNode),
    /// Bury this node and its contents under `node` until `node` is done.
    SuspendFor(ActionNode),
    /// End this node.  A buried node resumes in its place, if any.
    Done,
    /// Restart the whole stack from its root.
    Abort(&'static str),
}

/// Questions resolved innermost node first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Query {
    ShouldAttack(AgentHandle),
    ShouldRetreat,
    ShouldHurry,
    /// `Yes` if the first threat is the more dangerous one.
    MoreDangerous(AgentHandle, AgentHandle),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueryAnswer {
    Yes,
    No,
    #[default]
    Abstain,
}

// ── Node data ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct ScenarioMonitor {
    phase: RoundPhase,
}

#[derive(Clone, Debug, Default)]
pub struct TacticalMonitor;

#[derive(Clone, Debug, Default)]
pub struct Retreat {
    hide:    HideData,
    started: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Reload {
    timeout: CountdownTimer,
}

#[derive(Clone, Debug)]
pub enum ActionNode {
    ScenarioMonitor(ScenarioMonitor),
    TacticalMonitor(TacticalMonitor),
    Behave(Box<StateMachine>),
    Retreat(Retreat),
    Reload(Reload),
}

impl ActionNode {
    pub fn root() -> Self {
        ActionNode::ScenarioMonitor(ScenarioMonitor::default())
    }

    pub fn behave() -> Self {
        ActionNode::Behave(Box::new(StateMachine::new()))
    }

    pub fn retreat() -> Self {
        ActionNode::Retreat(Retreat::default())
    }

    pub fn reload() -> Self {
        ActionNode::Reload(Reload::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionNode::ScenarioMonitor(_) => "scenario_monitor",
            ActionNode::TacticalMonitor(_) => "tactical_monitor",
            ActionNode::Behave(_) => "behave",
            ActionNode::Retreat(_) => "retreat",
            ActionNode::Reload(_) => "reload",
        }
    }

    /// The child a container starts (and restarts when left childless).
    pub fn initial_child(&self) -> Option<ActionNode> {
        match self {
            ActionNode::ScenarioMonitor(_) => Some(ActionNode::TacticalMonitor(TacticalMonitor)),
            ActionNode::TacticalMonitor(_) => Some(ActionNode::behave()),
            _ => None,
        }
    }

    /// The state machine, if this is the `Behave` node.
    pub fn state_machine(&self) -> Option<&StateMachine> {
        match self {
            ActionNode::Behave(sm) => Some(sm),
            _ => None,
        }
    }

    // ── Lifecycle hooks ───────────────────────────────────────────────────

    pub fn on_start(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        match self {
            ActionNode::ScenarioMonitor(m) => m.phase = ctx.objectives.phase(),
            ActionNode::TacticalMonitor(_) => {}
            ActionNode::Behave(sm) => sm.start(brain, ctx),
            ActionNode::Retreat(r) => {
                r.started = ctx.now;
                r.hide = HideData::new(HideRequest {
                    threat:   brain.perception.last_known_position(),
                    duration: ctx.config.behavior.retreat_max_secs,
                    retreat:  true,
                });
                hide::enter(&mut r.hide, brain, ctx);
                tracing::debug!(agent = %brain.me, "retreating");
            }
            ActionNode::Reload(r) => {
                r.timeout.start(ctx.now, ctx.config.behavior.reload_timeout_secs);
                brain.task = Task::Reload;
            }
        }
    }

    pub fn update(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) -> ActionResult {
        match self {
            ActionNode::ScenarioMonitor(m) => m.update(brain, ctx),
            ActionNode::TacticalMonitor(_) => tactical_update(brain, ctx),
            ActionNode::Behave(sm) => {
                sm.update(brain, ctx);
                ActionResult::Continue
            }
            ActionNode::Retreat(r) => r.update(brain, ctx),
            ActionNode::Reload(r) => r.update(brain, ctx),
        }
    }

    pub fn on_suspend(&mut self, brain: &mut Brain, _ctx: &BotContext<'_>) {
        if let ActionNode::Behave(sm) = self {
            sm.suspend(brain);
        }
    }

    pub fn on_resume(&mut self, brain: &mut Brain, _ctx: &BotContext<'_>) {
        if let ActionNode::Behave(sm) = self {
            sm.resume(brain);
        }
    }

    pub fn on_end(&mut self, brain: &mut Brain, _ctx: &BotContext<'_>) {
        match self {
            ActionNode::Behave(sm) => sm.stop(brain),
            ActionNode::Retreat(_) => brain.mover.destroy_path(),
            _ => {}
        }
    }

    pub fn query(&self, q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
        match self {
            ActionNode::ScenarioMonitor(_) => match q {
                Query::ShouldHurry if ctx.objectives.any_contested_against(brain.team(ctx)) => QueryAnswer::Yes,
                _ => QueryAnswer::Abstain,
            },
            ActionNode::TacticalMonitor(_) => tactical_query(q, brain, ctx),
            ActionNode::Behave(sm) => sm.query(q, brain, ctx),
            ActionNode::Retreat(r) => hide::query(&r.hide, q, brain, ctx),
            ActionNode::Reload(_) => match q {
                Query::ShouldAttack(_) => QueryAnswer::No,
                _ => QueryAnswer::Abstain,
            },
        }
    }
}

// ── Monitors ──────────────────────────────────────────────────────────────────

impl ScenarioMonitor {
    fn update(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) -> ActionResult {
        let phase = ctx.objectives.phase();
        if phase == self.phase {
            return ActionResult::Continue;
        }
        let previous = std::mem::replace(&mut self.phase, phase);
        tracing::debug!(agent = %brain.me, ?previous, ?phase, "round phase changed");
        if phase == RoundPhase::Active {
            // Fresh round: start over from a clean slate.
            brain.reset();
            return ActionResult::ChangeTo(ActionNode::root());
        }
        ActionResult::Continue
    }
}

fn should_retreat(brain: &Brain, ctx: &BotContext<'_>) -> bool {
    brain.perception.recognized_enemy().is_some() && brain.perception.is_outnumbered() && brain.is_wounded(ctx)
}

fn tactical_update(brain: &mut Brain, ctx: &BotContext<'_>) -> ActionResult {
    let now = ctx.now;
    if brain.perception.recognized_enemy().is_none() && brain.perception.attacker.is_recent(&ctx.config.perception, now) {
        brain.look_hint = Some(brain.perception.attacker.from);
    }

    if should_retreat(brain, ctx) {
        return ActionResult::SuspendFor(ActionNode::retreat());
    }
    if ctx.world.weapon(brain.me).needs_reload() && !brain.perception.is_enemy_visible() {
        return ActionResult::SuspendFor(ActionNode::reload());
    }
    ActionResult::Continue
}

fn tactical_query(q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
    match q {
        Query::ShouldRetreat if should_retreat(brain, ctx) => QueryAnswer::Yes,
        Query::MoreDangerous(a, b) => {
            let agents = ctx.agents;
            let (Some(a), Some(b)) = (agents.resolve(a), agents.resolve(b)) else {
                return QueryAnswer::Abstain;
            };
            let pos = brain.position(ctx);
            let da = agents.position[a.index()].distance(pos);
            let db = agents.position[b.index()].distance(pos);
            if da <= db { QueryAnswer::Yes } else { QueryAnswer::No }
        }
        _ => QueryAnswer::Abstain,
    }
}

// ── Interrupters ──────────────────────────────────────────────────────────────

impl Retreat {
    fn update(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) -> ActionResult {
        let cfg = &ctx.config.behavior;
        let now = ctx.now;
        if now - self.started > cfg.retreat_max_secs {
            return ActionResult::Done;
        }
        let unseen = brain.perception.time_since_seen(now) > cfg.retreat_safe_secs;
        if self.hide.holding && unseen {
            tracing::debug!(agent = %brain.me, "retreat over");
            return ActionResult::Done;
        }
        match hide::update(&mut self.hide, brain, ctx) {
            Next::Stay => ActionResult::Continue,
            Next::Go(_) | Next::Done => ActionResult::Done,
        }
    }
}

impl Reload {
    fn update(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) -> ActionResult {
        let weapon = ctx.world.weapon(brain.me);
        if (!weapon.is_empty() && weapon.ready) || weapon.reserve == 0 {
            return ActionResult::Done;
        }
        if self.timeout.is_elapsed(ctx.now) {
            tracing::warn!(agent = %brain.me, "reload timed out");
            return ActionResult::Done;
        }
        brain.stop();
        brain.command.weapon.reload = true;
        brain.command.movement.crouch = brain.perception.enemies_nearby() > 0;
        ActionResult::Continue
    }
}
