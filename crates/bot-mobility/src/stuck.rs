//! Stuck detection over a rolling window of position samples.
//!
//! A body is *stuck* when, over a full window, its net displacement divided
//! by the window duration stays below `stuck_min_speed`.  The episode ends
//! once the body gets further than `stuck_reset_distance` from the position
//! where it got stuck.

use std::collections::VecDeque;

use bot_core::Vec3;

use crate::config::MobilityConfig;

#[derive(Clone, Debug, Default)]
pub struct StuckMonitor {
    samples:     VecDeque<(f32, Vec3)>,
    stuck:       bool,
    origin:      Vec3,
    stuck_since: f32,
    episodes:    u32,
}

impl StuckMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the body at `pos` at time `now`.  Returns `true` on the tick a
    /// new stuck episode begins.
    pub fn update(&mut self, cfg: &MobilityConfig, now: f32, pos: Vec3) -> bool {
        if self.stuck {
            if pos.distance(self.origin) > cfg.stuck_reset_distance {
                tracing::trace!(stuck_for = now - self.stuck_since, "no longer stuck");
                self.stuck = false;
                self.samples.clear();
                self.samples.push_back((now, pos));
            }
            return false;
        }

        self.samples.push_back((now, pos));
        // Keep exactly one sample at least a window old.
        while self.samples.len() > 1 && now - self.samples[1].0 >= cfg.stuck_window_secs {
            self.samples.pop_front();
        }
        let Some(&(t0, p0)) = self.samples.front() else { return false };
        let span = now - t0;
        if span < cfg.stuck_window_secs || span <= 0.0 {
            return false;
        }
        if p0.distance(pos) / span >= cfg.stuck_min_speed {
            return false;
        }

        self.stuck = true;
        self.origin = pos;
        self.stuck_since = now;
        self.episodes += 1;
        tracing::debug!(episode = self.episodes, x = pos.x, y = pos.y, "body stuck");
        true
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Where the current episode began.
    pub fn stuck_origin(&self) -> Option<Vec3> {
        self.stuck.then_some(self.origin)
    }

    pub fn stuck_duration(&self, now: f32) -> f32 {
        if self.stuck { now - self.stuck_since } else { 0.0 }
    }

    /// Stuck episodes since the last [`reset`](Self::reset).
    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    /// Forget samples, the current episode and the episode count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
