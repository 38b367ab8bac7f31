//! `WorldQuery` — the host's answers to geometric and equipment questions.

use bot_core::{AgentId, Vec3};
use bot_mobility::ObstacleProbe;
use bot_perception::Sight;

/// Ammunition state of an agent's current weapon.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponStatus {
    pub clip:      u32,
    pub clip_size: u32,
    pub reserve:   u32,
    /// Able to fire this tick (not switching, not mid-reload).
    pub ready:     bool,
}

impl WeaponStatus {
    pub fn loaded(clip_size: u32, reserve: u32) -> Self {
        Self { clip: clip_size, clip_size, reserve, ready: true }
    }

    pub fn is_empty(&self) -> bool {
        self.clip == 0
    }

    pub fn is_full(&self) -> bool {
        self.clip >= self.clip_size
    }

    /// Empty clip with ammunition left to load.
    pub fn needs_reload(&self) -> bool {
        self.is_empty() && self.reserve > 0
    }

    pub fn can_fire(&self) -> bool {
        self.ready && self.clip > 0
    }
}

/// Geometry and equipment queries answered by the host.
///
/// Shared read-only by every bot during a tick, hence `Sync`.
pub trait WorldQuery: Send + Sync {
    /// Unobstructed straight line between two points.
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool;

    /// Fraction of `target`'s body visible from `eye`, in `[0, 1]`.
    fn exposure(&self, eye: Vec3, target: AgentId) -> f32 {
        let _ = (eye, target);
        1.0
    }

    /// Distance to the first obstacle along horizontal unit `dir`, if within `max`.
    fn probe(&self, from: Vec3, dir: Vec3, max: f32) -> Option<f32> {
        let _ = (from, dir, max);
        None
    }

    fn weapon(&self, agent: AgentId) -> WeaponStatus;
}

/// Adapts a `WorldQuery` to the narrower perception and steering seams.
#[derive(Copy, Clone)]
pub struct WorldView<'a>(pub &'a dyn WorldQuery);

impl Sight for WorldView<'_> {
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self.0.line_of_sight(from, to)
    }

    fn exposure(&self, eye: Vec3, target: AgentId) -> f32 {
        self.0.exposure(eye, target)
    }
}

impl ObstacleProbe for WorldView<'_> {
    fn probe(&self, from: Vec3, dir: Vec3, max: f32) -> Option<f32> {
        self.0.probe(from, dir, max)
    }
}
