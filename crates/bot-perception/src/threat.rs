//! Threat records: what a bot saw of one enemy at one moment.

use bot_core::{AgentHandle, Vec3};

/// Snapshot of a candidate enemy.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatRecord {
    pub target: AgentHandle,
    /// Last known feet position.
    pub position: Vec3,
    /// Game time the snapshot was taken, seconds.
    pub seen_at: f32,
    /// In line of sight at `seen_at`.
    pub visible: bool,
    pub reloading: bool,
    /// Shielded from the front.
    pub protected: bool,
    pub firing: bool,
}

impl ThreatRecord {
    /// How dangerous this threat is to someone at `eye`; larger is worse.
    ///
    /// Nearer threats dominate.  Firing doubles the score, reloading or
    /// hiding behind a shield halves it.
    pub fn danger(&self, eye: Vec3) -> f32 {
        let mut score = 1.0 / (1.0 + eye.distance(self.position));
        if self.firing {
            score *= 2.0;
        }
        if self.reloading || self.protected {
            score *= 0.5;
        }
        score
    }
}
