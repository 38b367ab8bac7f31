//! Short-term memories: the last interesting noise and the last attacker.

use bot_core::{AgentHandle, NoiseKind, Vec3};

use crate::config::PerceptionConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeardNoise {
    pub position: Vec3,
    pub kind:     NoiseKind,
    pub heard_at: f32,
    pub source:   Option<AgentHandle>,
}

/// The single most interesting recent noise.
#[derive(Clone, Debug, Default)]
pub struct NoiseMemory {
    latest: Option<HeardNoise>,
}

impl NoiseMemory {
    /// Offer a noise heard at `listener`.  Returns `true` if it was kept.
    ///
    /// Out-of-range noises are ignored.  A new noise replaces the remembered
    /// one if that has expired or if it is hostile and the old one is not.
    /// Between noises of the same hostility the closer one wins.
    pub fn hear(&mut self, cfg: &PerceptionConfig, listener: Vec3, noise: HeardNoise) -> bool {
        let range = noise.kind.range() * cfg.hearing_scale;
        let dist = listener.distance(noise.position);
        if dist > range {
            return false;
        }
        let replace = match self.recent(cfg, noise.heard_at) {
            None => true,
            Some(old) => {
                let (new_hostile, old_hostile) = (noise.kind.is_hostile(), old.kind.is_hostile());
                (new_hostile && !old_hostile)
                    || (new_hostile == old_hostile && dist <= listener.distance(old.position))
            }
        };
        if replace {
            self.latest = Some(noise);
        }
        replace
    }

    /// The remembered noise, if it is still fresh at `now`.
    pub fn recent(&self, cfg: &PerceptionConfig, now: f32) -> Option<&HeardNoise> {
        self.latest
            .as_ref()
            .filter(|n| now - n.heard_at <= cfg.noise_memory_secs)
    }

    pub fn forget(&mut self) {
        self.latest = None;
    }
}

/// Who hurt us last, and from where.
#[derive(Clone, Debug, Default)]
pub struct AttackerMemory {
    pub attacker: Option<AgentHandle>,
    pub from:     Vec3,
    pub hurt_at:  Option<f32>,
}

impl AttackerMemory {
    pub fn record(&mut self, attacker: Option<AgentHandle>, from: Vec3, now: f32) {
        self.attacker = attacker;
        self.from = from;
        self.hurt_at = Some(now);
    }

    /// `true` if we were hurt within the memory window.
    pub fn is_recent(&self, cfg: &PerceptionConfig, now: f32) -> bool {
        self.hurt_at.is_some_and(|t| now - t <= cfg.attacker_memory_secs)
    }

    pub fn forget(&mut self) {
        *self = Self::default();
    }
}
