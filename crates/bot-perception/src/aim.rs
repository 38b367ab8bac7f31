//! Targeting accuracy model.
//!
//! A bot's aim is off by an angular error drawn uniformly from an envelope.
//! The envelope shrinks with *accuracy*, which blends the bot's skill with
//! its *focus*: how long it has been tracking roughly the same bearing.  The
//! error is redrawn on a randomized short interval, or immediately when the
//! bearing jumps (which also resets focus).

use bot_core::geo::{angle_diff, dir_from_angles, pitch_towards, yaw_towards};
use bot_core::{AgentRng, CountdownTimer, IntervalTimer, Vec3};

use crate::config::PerceptionConfig;

#[derive(Clone, Debug, Default)]
pub struct AimModel {
    error_yaw:    f32,
    error_pitch:  f32,
    envelope:     f32,
    recompute:    CountdownTimer,
    focus:        IntervalTimer,
    last_bearing: Option<f32>,
}

impl AimModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `bearing` (yaw toward the target) at time `now`.
    pub fn update(&mut self, cfg: &PerceptionConfig, now: f32, rng: &mut AgentRng, skill: f32, bearing: f32) {
        let retrack = self
            .last_bearing
            .is_none_or(|b| angle_diff(bearing, b).abs() > cfg.aim_retrack_deg);
        self.last_bearing = Some(bearing);

        if retrack {
            self.focus.start(now);
        }
        if retrack || self.recompute.is_elapsed(now) {
            self.envelope = self.error_envelope(cfg, skill, now);
            self.error_yaw = rng.range(-self.envelope, self.envelope);
            self.error_pitch = rng.range(-self.envelope * 0.5, self.envelope * 0.5);
            let interval = rng.range(cfg.aim_recompute_min_secs, cfg.aim_recompute_max_secs);
            self.recompute.start(now, interval);
        }
    }

    /// Accuracy in `[0, 1]`.
    pub fn accuracy(&self, cfg: &PerceptionConfig, skill: f32, now: f32) -> f32 {
        let focus = if !self.focus.has_started() || cfg.focus_time_secs <= 0.0 {
            0.0
        } else {
            (self.focus.elapsed(now) / cfg.focus_time_secs).clamp(0.0, 1.0)
        };
        let w = cfg.focus_weight.clamp(0.0, 1.0);
        ((1.0 - w) * skill.clamp(0.0, 1.0) + w * focus).clamp(0.0, 1.0)
    }

    /// Maximum angular error (degrees) at the current accuracy.
    pub fn error_envelope(&self, cfg: &PerceptionConfig, skill: f32, now: f32) -> f32 {
        let a = self.accuracy(cfg, skill, now);
        cfg.max_aim_error_deg + (cfg.min_aim_error_deg - cfg.max_aim_error_deg) * a
    }

    /// The envelope the current error was drawn from.
    pub fn current_envelope(&self) -> f32 {
        self.envelope
    }

    /// Current (yaw, pitch) error in degrees.
    pub fn error(&self) -> (f32, f32) {
        (self.error_yaw, self.error_pitch)
    }

    /// Where the bot actually aims when trying to hit `target` from `eye`.
    pub fn aim_point(&self, eye: Vec3, target: Vec3) -> Vec3 {
        let dist = eye.distance(target);
        if dist <= f32::EPSILON {
            return target;
        }
        let yaw = yaw_towards(eye, target) + self.error_yaw;
        let pitch = pitch_towards(eye, target) + self.error_pitch;
        eye + dir_from_angles(yaw, pitch) * dist
    }

    /// Drop focus and error (target lost, respawn).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
