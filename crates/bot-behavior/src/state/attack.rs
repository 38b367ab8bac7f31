//! `Attack` — fight the recognized enemy.
//!
//! In view: track it with the aim model, fire once facing the aim point,
//! and either strafe from side to side or crouch and hold.  Out of view:
//! chase its last known position for a while (hunting dispositions only).
//! Finishes when the enemy is dead, forgotten, or the chase runs out.

use bot_agent::EYE_HEIGHT;
use bot_core::geo::{angle_diff, flatten, left_of, yaw_towards};
use bot_core::{AgentHandle, AgentId, CountdownTimer, IntervalTimer, Vec3};
use bot_mobility::{MoveCommand, MoveSpeed, PathStatus};
use bot_perception::ThreatRecord;

use super::Next;
use crate::action::{Query, QueryAnswer};
use crate::brain::{Brain, Task};
use crate::context::BotContext;
use crate::world::WeaponStatus;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackData {
    pub target:  Option<AgentHandle>,
    /// Next strafe decision.
    pub dodge:   CountdownTimer,
    /// `+1` strafes left, `-1` right.
    pub strafe:  f32,
    /// Crouch-and-hold in progress while running.
    pub holding: CountdownTimer,
    pub chasing: bool,
    pub chase:   IntervalTimer,
}

pub fn enter(data: &mut AttackData, brain: &mut Brain, _ctx: &BotContext<'_>) {
    data.target = brain.perception.recognized_enemy().map(|r| r.target);
    data.strafe = 1.0;
    brain.task = Task::Fight;
    brain.mover.destroy_path();
    tracing::debug!(agent = %brain.me, target = ?data.target, "attacking");
}

pub fn update(data: &mut AttackData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let Some(rec) = brain.perception.recognized_enemy().copied() else {
        return Next::Done;
    };
    let Some(enemy) = ctx.agents.resolve(rec.target) else {
        brain.perception.forget_enemy();
        return Next::Done;
    };
    if data.target != Some(rec.target) {
        tracing::debug!(agent = %brain.me, target = %rec.target, "switching target");
        data.target = Some(rec.target);
        data.chasing = false;
        brain.aim.reset();
    }

    let weapon = ctx.world.weapon(brain.me);
    brain.command.weapon.reload = weapon.needs_reload();

    if rec.visible {
        engage(data, brain, ctx, enemy, weapon);
        Next::Stay
    } else {
        chase(data, brain, ctx, &rec)
    }
}

pub fn query(_data: &AttackData, q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
    match q {
        Query::ShouldRetreat if brain.is_wounded(ctx) && brain.perception.is_outnumbered() => QueryAnswer::Yes,
        _ => QueryAnswer::Abstain,
    }
}

fn engage(data: &mut AttackData, brain: &mut Brain, ctx: &BotContext<'_>, enemy: AgentId, weapon: WeaponStatus) {
    let cfg = &ctx.config.behavior;
    let now = ctx.now;
    data.chasing = false;
    brain.mover.destroy_path();

    let eye = brain.eye(ctx);
    let chest = ctx.agents.chest_position(enemy);
    let skill = brain.profile.skill;
    brain.aim.update(&ctx.config.perception, now, &mut brain.rng, skill, yaw_towards(eye, chest));
    let aim_point = brain.aim.aim_point(eye, chest);

    let view_yaw = ctx.agents.yaw[brain.me.index()];
    let facing = angle_diff(yaw_towards(eye, aim_point), view_yaw).abs() <= cfg.fire_tolerance_deg;
    brain.command.weapon.fire = facing && weapon.can_fire();

    let mut cmd = MoveCommand::stop().looking_at(aim_point);
    let holding = data.holding.has_started() && !data.holding.is_elapsed(now);
    if !holding && data.dodge.is_elapsed(now) {
        data.dodge.start(now, brain.rng.range(cfg.dodge_interval_min, cfg.dodge_interval_max));
        if brain.rng.random::<f32>() < cfg.crouch_hold_chance * brain.profile.aggression * 2.0 {
            data.holding.start(now, cfg.crouch_hold_secs);
        } else {
            data.holding.invalidate();
            data.strafe = if brain.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        }
    }

    if data.holding.has_started() && !data.holding.is_elapsed(now) {
        cmd.crouch = true;
    } else {
        let toward = flatten(chest - eye).normalize_or_zero();
        cmd.direction = left_of(toward) * data.strafe;
        cmd.speed = if skill >= 0.5 { MoveSpeed::Run } else { MoveSpeed::Walk };
    }
    brain.command.movement = cmd;
}

fn chase(data: &mut AttackData, brain: &mut Brain, ctx: &BotContext<'_>, rec: &ThreatRecord) -> Next {
    if !brain.profile.disposition.hunts() {
        brain.perception.forget_enemy();
        return Next::Done;
    }
    let now = ctx.now;
    if !data.chasing {
        data.chasing = true;
        data.chase.start(now);
        if let Err(err) = brain.path_to(ctx, rec.position) {
            tracing::debug!(agent = %brain.me, %err, "cannot chase");
            brain.perception.forget_enemy();
            return Next::Done;
        }
    }
    if data.chase.is_greater_than(now, ctx.config.behavior.chase_secs) {
        tracing::debug!(agent = %brain.me, target = %rec.target, "chase abandoned");
        brain.perception.forget_enemy();
        return Next::Done;
    }

    brain.mover.speed = MoveSpeed::Run;
    match brain.follow(ctx) {
        PathStatus::Progressing => {
            brain.command.movement.look_at = Some(rec.position + Vec3::Z * EYE_HEIGHT);
            Next::Stay
        }
        PathStatus::ReachedEnd | PathStatus::Failed(_) => {
            brain.perception.forget_enemy();
            Next::Done
        }
    }
}
