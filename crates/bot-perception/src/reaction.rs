//! The reaction queue: a fixed-capacity ring buffer read at a delay.
//!
//! Perception writes one entry per tick at the head (possibly `None`, meaning
//! "nothing noticed").  The bot acts on the entry written `steps` ticks
//! earlier, which models reaction latency without unbounded memory.
//!
//! ```text
//!   write →  [ t-3 | t-2 | t-1 | t ]
//!                    ^ read with steps = 2
//! ```

use crate::config::PerceptionConfig;
use crate::threat::ThreatRecord;

/// Fixed-size delayed-read ring buffer.
#[derive(Clone, Debug)]
pub struct ReactionQueue {
    slots:   Vec<Option<ThreatRecord>>,
    /// Index the next write goes to.
    head:    usize,
    /// Number of writes so far, saturating at capacity.
    written: usize,
}

impl ReactionQueue {
    /// A queue holding `capacity` ticks of history (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { slots: vec![None; capacity], head: 0, written: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that hold a written entry.
    pub fn len(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Write this tick's entry at the head.
    pub fn push(&mut self, entry: Option<ThreatRecord>) {
        self.slots[self.head] = entry;
        self.head = (self.head + 1) % self.slots.len();
        self.written = (self.written + 1).min(self.slots.len());
    }

    /// The entry written `steps` pushes ago (`0` = the latest).
    ///
    /// `None` if that entry was empty or has not been written yet.
    pub fn read(&self, steps: usize) -> Option<&ThreatRecord> {
        if steps >= self.written {
            return None;
        }
        let cap = self.slots.len();
        let index = (self.head + cap - 1 - steps) % cap;
        self.slots[index].as_ref()
    }

    /// Forget everything (e.g. on respawn).
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.head = 0;
        self.written = 0;
    }
}

/// Reaction latency in ticks for a bot of `skill` in `[0, 1]`.
///
/// Interpolates between the configured slowest and fastest latency, converts
/// to ticks, and clamps into `[0, capacity - 1]` so a read never reaches past
/// the oldest slot.
pub fn reaction_steps(skill: f32, tick_interval_secs: f32, cfg: &PerceptionConfig, capacity: usize) -> usize {
    let max_steps = capacity.max(1) - 1;
    if !(tick_interval_secs > 0.0) {
        return max_steps;
    }
    let skill = if skill.is_nan() { 0.0 } else { skill.clamp(0.0, 1.0) };
    let latency = cfg.max_reaction_secs + (cfg.min_reaction_secs - cfg.max_reaction_secs) * skill;
    let steps = (latency.max(0.0) / tick_interval_secs).round();
    if steps.is_finite() { (steps as usize).min(max_steps) } else { max_steps }
}
