//! `InvestigateNoise` — walk over to where a noise came from.

use bot_agent::EYE_HEIGHT;
use bot_core::{CountdownTimer, Vec3};
use bot_mobility::{MoveSpeed, PathStatus};

use super::{Next, Transition};
use crate::brain::{Brain, Task};
use crate::context::BotContext;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvestigateData {
    pub position: Vec3,
    /// A nearer noise may only distract once this runs out.
    pub attend:   CountdownTimer,
    pub pathed:   bool,
    pub started:  f32,
}

impl InvestigateData {
    pub fn new(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }
}

pub fn enter(data: &mut InvestigateData, brain: &mut Brain, ctx: &BotContext<'_>) {
    data.started = ctx.now;
    data.attend.start(ctx.now, ctx.config.behavior.investigate_attend_secs);
    brain.task = Task::Investigate;
}

pub fn update(data: &mut InvestigateData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let cfg = &ctx.config.behavior;
    let now = ctx.now;
    let pos = brain.position(ctx);

    if let Some(noise) = brain.perception.noise.recent(&ctx.config.perception, now) {
        let elsewhere = noise.position.distance(data.position) > 1.0;
        if elsewhere && data.attend.is_elapsed(now) && pos.distance(noise.position) < pos.distance(data.position) {
            return Next::Go(Transition::Investigate(noise.position));
        }
    }
    if now - data.started > cfg.investigate_max_secs {
        brain.perception.noise.forget();
        return Next::Go(Transition::Idle);
    }

    if !data.pathed {
        data.pathed = true;
        if let Err(err) = brain.path_to(ctx, data.position) {
            tracing::debug!(agent = %brain.me, %err, "cannot reach noise");
            brain.perception.noise.forget();
            return Next::Go(Transition::Idle);
        }
    }

    brain.mover.speed = MoveSpeed::Walk;
    match brain.follow(ctx) {
        PathStatus::Progressing => {
            brain.command.movement.look_at = Some(data.position + Vec3::Z * EYE_HEIGHT);
            Next::Stay
        }
        PathStatus::ReachedEnd | PathStatus::Failed(_) => {
            brain.perception.noise.forget();
            Next::Go(Transition::Idle)
        }
    }
}
