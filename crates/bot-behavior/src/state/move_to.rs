//! `MoveTo` — travel to a fixed or moving goal, then hand over to the state
//! the task calls for.

use bot_core::{AgentHandle, NodeId, ObjectiveHandle, Vec3};
use bot_mobility::{MoveSpeed, PathStatus};

use super::{HideRequest, HoldMode, Next, Transition};
use crate::action::{Query, QueryAnswer};
use crate::brain::{Brain, Task};
use crate::context::BotContext;

/// Where to go.  Agent and objective goals are re-resolved every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveGoal {
    Position(Vec3),
    Node(NodeId),
    Agent(AgentHandle),
    Objective(ObjectiveHandle),
}

impl Default for MoveGoal {
    fn default() -> Self {
        MoveGoal::Position(Vec3::ZERO)
    }
}

/// Why the bot is going there; decides what happens on arrival.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveTask {
    #[default]
    Roam,
    Fetch,
    Capture,
    Defend,
    /// Head for an enemy-owned escort target.
    Intercept,
    /// Hide once there.
    TakeCover,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveToData {
    pub goal:       MoveGoal,
    pub task:       MoveTask,
    pub needs_path: bool,
    /// Goal position the current path was planned to.
    pub planned:    Option<Vec3>,
}

impl MoveToData {
    pub fn new(goal: MoveGoal, task: MoveTask) -> Self {
        Self { goal, task, needs_path: true, planned: None }
    }
}

pub fn enter(data: &mut MoveToData, brain: &mut Brain, _ctx: &BotContext<'_>) {
    brain.task = match data.task {
        MoveTask::Roam | MoveTask::Intercept => Task::Roam,
        MoveTask::Fetch => Task::Fetch,
        MoveTask::Capture => Task::Capture,
        MoveTask::Defend => Task::Defend,
        MoveTask::TakeCover => Task::TakeCover,
    };
    brain.mover.speed = MoveSpeed::Run;
}

pub fn update(data: &mut MoveToData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let Some(target) = resolve(data, brain, ctx) else {
        tracing::debug!(agent = %brain.me, goal = ?data.goal, "move goal no longer valid");
        return Next::Go(Transition::Idle);
    };

    let drifted = data
        .planned
        .is_none_or(|p| p.distance(target) > ctx.config.behavior.repath_drift);
    if data.needs_path {
        if let Err(err) = brain.path_to(ctx, target) {
            tracing::debug!(agent = %brain.me, %err, "no path to move goal");
            return Next::Go(Transition::Idle);
        }
        data.needs_path = false;
        data.planned = Some(target);
    } else if drifted {
        match brain.repath_to(ctx, target) {
            Ok(true) => data.planned = Some(target),
            Ok(false) => {}
            Err(err) => {
                tracing::debug!(agent = %brain.me, %err, "lost the route to a moving goal");
                return Next::Go(Transition::Idle);
            }
        }
    }

    match brain.follow(ctx) {
        PathStatus::Progressing => Next::Stay,
        PathStatus::ReachedEnd => arrive(data),
        PathStatus::Failed(why) => {
            tracing::debug!(agent = %brain.me, ?why, "move failed");
            Next::Go(Transition::Idle)
        }
    }
}

pub fn query(data: &MoveToData, q: Query, _brain: &Brain, _ctx: &BotContext<'_>) -> QueryAnswer {
    match (q, data.task) {
        (Query::ShouldHurry, MoveTask::Defend) => QueryAnswer::Yes,
        _ => QueryAnswer::Abstain,
    }
}

/// The goal's position this tick, or `None` once it is gone or moot.
fn resolve(data: &MoveToData, brain: &Brain, ctx: &BotContext<'_>) -> Option<Vec3> {
    match data.goal {
        MoveGoal::Position(p) => Some(p),
        MoveGoal::Node(n) => ctx.graph.contains(n).then(|| ctx.graph.node_center(n)),
        MoveGoal::Agent(h) => ctx.agents.resolve(h).map(|id| ctx.agents.position[id.index()]),
        MoveGoal::Objective(h) => {
            let team = brain.team(ctx);
            let obj = ctx.objectives.get(h)?;
            let moot = match data.task {
                MoveTask::Capture => obj.owner == team || obj.locked,
                MoveTask::Defend => obj.owner != team || !obj.is_contested(),
                MoveTask::Fetch => obj.is_carried() && obj.carrier_team == team,
                _ => false,
            };
            if moot {
                return None;
            }
            ctx.objectives.destination_for(h, team)
        }
    }
}

fn arrive(data: &MoveToData) -> Next {
    match (data.task, data.goal) {
        (MoveTask::Capture, MoveGoal::Objective(h)) => Next::Go(Transition::Capture(h, HoldMode::Capture)),
        (MoveTask::Defend, MoveGoal::Objective(h)) => Next::Go(Transition::Capture(h, HoldMode::Defend)),
        (MoveTask::TakeCover, _) => Next::Go(Transition::Hide(HideRequest::default())),
        _ => Next::Go(Transition::Idle),
    }
}
