//! `Idle` — standing still and choosing what to do next.
//!
//! Idle never moves the body.  Each update it walks a fixed priority list
//! and switches as soon as something applies:
//!
//! 1. an objective this bot carries → `CarryObjective`
//! 2. a teammate escorting or carrying an objective → `Follow`
//! 3. a recent noise (hunting dispositions only) → `InvestigateNoise`
//! 4. the nearest objective needing attention → `MoveTo`
//! 5. anywhere on the map → `MoveTo` (roam)
//!
//! Once the round is over the bot stays idle.

use bot_core::geo::horizontal_distance;
use bot_core::{NodeId, Team};
use bot_objective::{Objective, ObjectiveKind, RoundPhase};

use super::{MoveGoal, MoveTask, Next, Transition};
use crate::brain::{Brain, Task};
use crate::context::BotContext;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdleData {
    pub since: f32,
}

pub fn enter(data: &mut IdleData, brain: &mut Brain, ctx: &BotContext<'_>) {
    data.since = ctx.now;
    brain.task = Task::None;
    brain.stop();
}

pub fn update(_data: &mut IdleData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    brain.stop();
    if matches!(ctx.objectives.phase(), RoundPhase::Over { .. }) {
        return Next::Stay;
    }

    let me = ctx.agents.handle(brain.me);
    let team = brain.team(ctx);
    let pos = brain.position(ctx);

    if let Some(obj) = ctx.objectives.iter().find(|o| o.carrier == Some(me)) {
        return Next::Go(Transition::Carry(obj.handle));
    }

    let escort = ctx.objectives.iter().find_map(|o| {
        let carrier = o.carrier.filter(|c| *c != me && ctx.agents.is_valid(*c))?;
        let ours = match o.kind {
            ObjectiveKind::EscortTarget => o.owner == team,
            ObjectiveKind::CarryItem => o.carrier_team == team,
            ObjectiveKind::CapturePoint => false,
        };
        ours.then_some(carrier)
    });
    if let Some(leader) = escort {
        return Next::Go(Transition::Follow(leader));
    }

    if brain.profile.disposition.hunts() {
        if let Some(noise) = brain.perception.noise.recent(&ctx.config.perception, ctx.now) {
            return Next::Go(Transition::Investigate(noise.position));
        }
    }

    let nearest = ctx
        .objectives
        .iter()
        .filter_map(|o| plan_for(o, team).map(|task| (horizontal_distance(pos, o.position), o, task)))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((_, obj, task)) = nearest {
        return Next::Go(Transition::MoveTo(MoveGoal::Objective(obj.handle), task));
    }

    let count = ctx.graph.node_count();
    if count == 0 {
        return Next::Stay;
    }
    let node = NodeId(brain.rng.below(count) as u32);
    Next::Go(Transition::MoveTo(MoveGoal::Node(node), MoveTask::Roam))
}

/// What `team` should do about `obj`, if anything.
fn plan_for(obj: &Objective, team: Team) -> Option<MoveTask> {
    match obj.kind {
        ObjectiveKind::CapturePoint if obj.locked => None,
        ObjectiveKind::CapturePoint if obj.owner != team => Some(MoveTask::Capture),
        ObjectiveKind::CapturePoint if obj.is_contested() => Some(MoveTask::Defend),
        ObjectiveKind::CapturePoint => None,
        ObjectiveKind::CarryItem if obj.is_carried() && obj.carrier_team == team => None,
        ObjectiveKind::CarryItem => Some(MoveTask::Fetch),
        ObjectiveKind::EscortTarget if obj.owner == team => None,
        ObjectiveKind::EscortTarget => Some(MoveTask::Intercept),
    }
}
