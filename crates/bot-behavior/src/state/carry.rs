//! `CarryObjective` — bring a carried objective to the team's destination.
//!
//! A carrier avoids fights: it only shoots back at enemies close enough to
//! stop it anyway.

use bot_core::{ObjectiveHandle, Vec3};
use bot_mobility::{MoveSpeed, PathStatus};

use super::{Next, Transition};
use crate::action::{Query, QueryAnswer};
use crate::brain::{Brain, Task};
use crate::context::BotContext;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarryData {
    pub objective:   Option<ObjectiveHandle>,
    /// Destination the current path leads to.
    pub destination: Option<Vec3>,
    /// Standing on the destination, waiting for the capture to register.
    pub arrived:     bool,
}

impl CarryData {
    pub fn new(objective: ObjectiveHandle) -> Self {
        Self { objective: Some(objective), destination: None, arrived: false }
    }
}

pub fn enter(_data: &mut CarryData, brain: &mut Brain, _ctx: &BotContext<'_>) {
    brain.task = Task::Carry;
}

pub fn update(data: &mut CarryData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let me = ctx.agents.handle(brain.me);
    let Some(handle) = data.objective.filter(|h| ctx.objectives.carrier(*h) == Some(me)) else {
        tracing::debug!(agent = %brain.me, "no longer carrying");
        return Next::Go(Transition::Idle);
    };
    let Some(dest) = ctx.objectives.destination_for(handle, brain.team(ctx)) else {
        return Next::Go(Transition::Idle);
    };

    match data.destination {
        None => {
            if let Err(err) = brain.path_to(ctx, dest) {
                tracing::debug!(agent = %brain.me, %err, "no path to destination");
                return Next::Go(Transition::Idle);
            }
            data.destination = Some(dest);
            data.arrived = false;
        }
        Some(d) if d.distance(dest) > ctx.config.behavior.repath_drift => match brain.repath_to(ctx, dest) {
            Ok(true) => {
                data.destination = Some(dest);
                data.arrived = false;
            }
            Ok(false) => {}
            Err(err) => {
                tracing::debug!(agent = %brain.me, %err, "no path to moved destination");
                return Next::Go(Transition::Idle);
            }
        },
        Some(_) => {}
    }

    if data.arrived {
        brain.stop();
        return Next::Stay;
    }
    brain.mover.speed = MoveSpeed::Run;
    match brain.follow(ctx) {
        PathStatus::Progressing => Next::Stay,
        PathStatus::ReachedEnd => {
            data.arrived = true;
            brain.stop();
            Next::Stay
        }
        PathStatus::Failed(why) => {
            tracing::debug!(agent = %brain.me, ?why, "carry route failed");
            Next::Go(Transition::Idle)
        }
    }
}

pub fn query(_data: &CarryData, q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
    match q {
        Query::ShouldAttack(h) => {
            let range = ctx.config.behavior.carrier_self_defense_range;
            let close = ctx
                .agents
                .resolve(h)
                .is_some_and(|id| ctx.agents.position[id.index()].distance(brain.position(ctx)) <= range);
            if close { QueryAnswer::Yes } else { QueryAnswer::No }
        }
        Query::ShouldHurry => QueryAnswer::Yes,
        _ => QueryAnswer::Abstain,
    }
}
