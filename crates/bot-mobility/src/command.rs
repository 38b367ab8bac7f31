//! Locomotion intents — what a bot asks its body to do this tick.
//!
//! A [`MoveCommand`] is produced by the path follower (and overridden by
//! behavior states for aiming) and handed to the host, which turns it into
//! player input.  Directions are in world space; [`MoveCommand::local_axes`]
//! converts them to forward/strafe input for a given view yaw.

use bot_core::geo::{dir_from_yaw, flatten, left_of};
use bot_core::Vec3;

/// Requested gait, ordered slowest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveSpeed {
    #[default]
    Stop,
    Walk,
    Run,
}

/// One tick of locomotion input.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    /// Horizontal unit direction of travel, or zero.
    pub direction: Vec3,
    pub speed:     MoveSpeed,
    pub jump:      bool,
    pub crouch:    bool,
    /// Ladder input: `+1` climbs, `-1` descends, `0` lets go.
    pub climb:     f32,
    /// World point to turn the view toward; `None` keeps the current view.
    pub look_at:   Option<Vec3>,
}

impl MoveCommand {
    /// Stand still, keep looking where we look.
    pub fn stop() -> Self {
        Self::default()
    }

    /// Move horizontally from `from` toward `to`.
    pub fn toward(from: Vec3, to: Vec3, speed: MoveSpeed) -> Self {
        Self { direction: flatten(to - from).normalize_or_zero(), speed, ..Self::default() }
    }

    pub fn looking_at(mut self, point: Vec3) -> Self {
        self.look_at = Some(point);
        self
    }

    pub fn is_moving(&self) -> bool {
        self.speed != MoveSpeed::Stop && self.direction != Vec3::ZERO
    }

    /// `(forward, left)` input in `[-1, 1]` for a body facing `yaw`.
    pub fn local_axes(&self, yaw: f32) -> (f32, f32) {
        if !self.is_moving() {
            return (0.0, 0.0);
        }
        let forward = dir_from_yaw(yaw);
        (self.direction.dot(forward), self.direction.dot(left_of(forward)))
    }
}
