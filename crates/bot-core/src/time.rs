//! Simulation time model and the timers bots keep across ticks.
//!
//! # Design
//!
//! The canonical time unit is a monotonically increasing `Tick` counter
//! advanced once per fixed simulation step.  Bots reason in seconds, so
//! `SimClock` maps ticks to game time:
//!
//!   now_secs = tick * tick_interval_secs
//!
//! All "waiting" in the decision core is expressed as one of the timers
//! below, held in per-agent state and compared against `now` every tick.
//! Nothing ever blocks.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and game seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds of game time per tick (e.g. `1/30`).
    pub tick_interval_secs: f32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_interval_secs: f32) -> Self {
        Self { tick_interval_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Game time in seconds at the current tick.
    #[inline]
    pub fn now_secs(&self) -> f32 {
        self.secs_at(self.current_tick)
    }

    /// Game time in seconds at an arbitrary tick.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f32 {
        (tick.0 as f64 * self.tick_interval_secs as f64) as f32
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.now_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the host and passed to the
/// simulation runner.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per tick.  Bots are designed for 10–60 Hz updates.
    pub tick_interval_secs: f32,

    /// Total ticks to simulate when driven by `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical decisions.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Call the snapshot observer every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_interval_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs:      1.0 / 30.0,
            total_ticks:             30 * 60,
            seed:                    0,
            num_threads:             None,
            snapshot_interval_ticks: 0,
        }
    }
}

// ── CountdownTimer ────────────────────────────────────────────────────────────

/// A one-shot deadline.  Unstarted timers count as elapsed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountdownTimer {
    duration: f32,
    deadline: Option<f32>,
}

impl CountdownTimer {
    /// A timer already running for `duration` seconds from `now`.
    pub fn started(now: f32, duration: f32) -> Self {
        Self { duration, deadline: Some(now + duration) }
    }

    pub fn start(&mut self, now: f32, duration: f32) {
        self.duration = duration;
        self.deadline = Some(now + duration);
    }

    /// Restart with the previously used duration.
    pub fn reset(&mut self, now: f32) {
        self.deadline = Some(now + self.duration);
    }

    pub fn invalidate(&mut self) {
        self.deadline = None;
    }

    pub fn has_started(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_elapsed(&self, now: f32) -> bool {
        self.deadline.is_none_or(|d| now >= d)
    }

    /// Seconds left, or `0.0` if elapsed/unstarted.
    pub fn remaining(&self, now: f32) -> f32 {
        self.deadline.map_or(0.0, |d| (d - now).max(0.0))
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

// ── IntervalTimer ─────────────────────────────────────────────────────────────

/// Measures time since a reference moment.  Unstarted timers report an
/// infinite elapsed time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalTimer {
    started_at: Option<f32>,
}

impl IntervalTimer {
    pub fn started(now: f32) -> Self {
        Self { started_at: Some(now) }
    }

    pub fn start(&mut self, now: f32) {
        self.started_at = Some(now);
    }

    pub fn invalidate(&mut self) {
        self.started_at = None;
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: f32) -> f32 {
        self.started_at.map_or(f32::INFINITY, |s| (now - s).max(0.0))
    }

    pub fn is_greater_than(&self, now: f32, secs: f32) -> bool {
        self.elapsed(now) > secs
    }
}
