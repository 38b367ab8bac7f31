//! Handing bot commands to bodies.
//!
//! The decision core never moves a body itself.  Each tick the simulation
//! passes every bot's [`BotCommand`] to a [`LocomotionSink`], which is where
//! the host turns intents into player input.  [`KinematicSink`] is a
//! physics-free stand-in for tests and headless runs.

use bot_agent::AgentStore;
use bot_behavior::BotCommand;
use bot_core::geo::{pitch_towards, yaw_towards};
use bot_core::{AgentId, Vec3};
use bot_mobility::MoveSpeed;

/// Receives one command per living bot per tick, in ascending `AgentId`
/// order.
pub trait LocomotionSink {
    fn apply(&mut self, agent: AgentId, command: &BotCommand, agents: &mut AgentStore, dt: f32);
}

impl<F> LocomotionSink for F
where
    F: FnMut(AgentId, &BotCommand, &mut AgentStore, f32),
{
    fn apply(&mut self, agent: AgentId, command: &BotCommand, agents: &mut AgentStore, dt: f32) {
        self(agent, command, agents, dt)
    }
}

// ── KinematicSink ─────────────────────────────────────────────────────────────

/// Moves bodies exactly as commanded: no gravity, no collisions, instant
/// turning.
#[derive(Clone, Debug)]
pub struct KinematicSink {
    pub walk_speed:  f32,
    pub run_speed:   f32,
    /// Vertical speed on a ladder.
    pub climb_speed: f32,
}

impl Default for KinematicSink {
    fn default() -> Self {
        Self { walk_speed: 2.5, run_speed: 5.0, climb_speed: 2.0 }
    }
}

impl KinematicSink {
    fn speed_of(&self, speed: MoveSpeed) -> f32 {
        match speed {
            MoveSpeed::Stop => 0.0,
            MoveSpeed::Walk => self.walk_speed,
            MoveSpeed::Run => self.run_speed,
        }
    }
}

impl LocomotionSink for KinematicSink {
    fn apply(&mut self, agent: AgentId, command: &BotCommand, agents: &mut AgentStore, dt: f32) {
        let i = agent.index();
        if !agents.contains(agent) || !agents.alive[i] {
            return;
        }
        let mv = &command.movement;

        if let Some(target) = mv.look_at {
            let eye = agents.eye_position(agent);
            if target.distance(eye) > f32::EPSILON {
                agents.yaw[i] = yaw_towards(eye, target);
                agents.pitch[i] = pitch_towards(eye, target);
            }
        }

        let mut velocity = if mv.is_moving() { mv.direction * self.speed_of(mv.speed) } else { Vec3::ZERO };
        agents.on_ladder[i] = mv.climb != 0.0;
        if agents.on_ladder[i] {
            velocity.z = mv.climb.signum() * self.climb_speed;
        }
        agents.velocity[i] = velocity;
        agents.position[i] += velocity * dt;
        agents.on_ground[i] = !agents.on_ladder[i];

        agents.is_crouching[i] = mv.crouch;
        agents.is_sprinting[i] = mv.speed == MoveSpeed::Run && mv.is_moving();
        agents.is_firing[i] = command.weapon.fire;
        agents.is_reloading[i] = command.weapon.reload;
    }
}
