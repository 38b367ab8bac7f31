//! `CaptureObjective` — stand on a capture point until it is resolved.
//!
//! In `Capture` mode the state ends once the point belongs to the bot's
//! team; in `Defend` mode once it no longer does.  Either way a locked or
//! vanished objective also ends it.

use bot_core::geo::horizontal_distance;
use bot_core::{CountdownTimer, ObjectiveHandle, Vec3};
use bot_mobility::PathStatus;

use super::{Next, Transition};
use crate::action::{Query, QueryAnswer};
use crate::brain::{Brain, Task};
use crate::context::BotContext;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HoldMode {
    #[default]
    Capture,
    Defend,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureData {
    pub objective: Option<ObjectiveHandle>,
    pub mode:      HoldMode,
    pub look:      CountdownTimer,
    pub look_dir:  Vec3,
    /// A path was planned at least once since entry.
    pub pathed:    bool,
}

impl CaptureData {
    pub fn new(objective: ObjectiveHandle, mode: HoldMode) -> Self {
        Self { objective: Some(objective), mode, ..Self::default() }
    }
}

pub fn enter(data: &mut CaptureData, brain: &mut Brain, _ctx: &BotContext<'_>) {
    brain.task = match data.mode {
        HoldMode::Capture => Task::Capture,
        HoldMode::Defend => Task::Defend,
    };
}

pub fn update(data: &mut CaptureData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let Some(obj) = data.objective.and_then(|h| ctx.objectives.get(h)) else {
        return Next::Go(Transition::Idle);
    };
    let team = brain.team(ctx);
    let resolved = match data.mode {
        HoldMode::Capture => obj.owner == team,
        HoldMode::Defend => obj.owner != team,
    };
    if resolved || obj.locked {
        tracing::debug!(agent = %brain.me, objective = ?obj.handle, owner = ?obj.owner, "objective settled");
        return Next::Go(Transition::Idle);
    }

    let target = obj.position;
    if horizontal_distance(brain.position(ctx), target) > ctx.config.behavior.capture_radius {
        if !brain.mover.has_path() {
            let planned = if data.pathed {
                brain.repath_to(ctx, target)
            } else {
                brain.path_to(ctx, target).map(|()| true)
            };
            match planned {
                Ok(true) => data.pathed = true,
                Ok(false) => {
                    brain.stop();
                    return Next::Stay;
                }
                Err(err) => {
                    tracing::debug!(agent = %brain.me, %err, "cannot reach objective");
                    return Next::Go(Transition::Idle);
                }
            }
        }
        return match brain.follow(ctx) {
            PathStatus::Failed(_) => Next::Go(Transition::Idle),
            _ => Next::Stay,
        };
    }

    brain.mover.destroy_path();
    brain.stop();
    if data.look.is_elapsed(ctx.now) {
        data.look.start(ctx.now, ctx.config.behavior.capture_look_secs);
        data.look_dir = brain.rng.horizontal_unit();
    }
    brain.command.movement.crouch = data.mode == HoldMode::Defend;
    brain.command.movement.look_at = Some(brain.eye(ctx) + data.look_dir * 10.0);
    Next::Stay
}

pub fn query(_data: &CaptureData, q: Query, _brain: &Brain, _ctx: &BotContext<'_>) -> QueryAnswer {
    match q {
        Query::ShouldAttack(_) => QueryAnswer::Yes,
        _ => QueryAnswer::Abstain,
    }
}
