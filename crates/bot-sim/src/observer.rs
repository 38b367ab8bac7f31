//! Simulation observer trait for progress reporting and data collection.

use bot_agent::AgentStore;
use bot_behavior::{Bot, BotCommand, StateTag};
use bot_core::{AgentId, Tick};
use bot_objective::GameEvent;

#[cfg(not(feature = "fx-hash"))]
pub type StateCounts = std::collections::HashMap<StateTag, usize>;
#[cfg(feature = "fx-hash")]
pub type StateCounts = rustc_hash::FxHashMap<StateTag, usize>;

/// What happened during one tick.
#[derive(Clone, Debug, Default)]
pub struct TickSummary {
    /// Events drained from the feed this tick.
    pub events: usize,
    /// Bots with a living body.
    pub alive:  usize,
    /// Living bots per finite state.  Bots outside `Behave` (retreating,
    /// reloading) are not counted.
    pub states: StateCounts,
}

impl TickSummary {
    pub fn in_state(&self, tag: StateTag) -> usize {
        self.states.get(&tag).copied().unwrap_or(0)
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — state printer
///
/// ```rust,ignore
/// struct StatePrinter;
///
/// impl SimObserver for StatePrinter {
///     fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
///         println!("tick {tick}: {} alive, {} fighting", summary.alive, summary.in_state(StateTag::Attack));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every event drained this tick, after the objective tracker
    /// has applied it and before bots decide.
    fn on_event(&mut self, _tick: Tick, _event: &GameEvent) {}

    /// Called for each bot's command just before it reaches the locomotion
    /// sink.
    fn on_command(&mut self, _tick: Tick, _agent: AgentId, _command: &BotCommand) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks) with read-only access to bodies and bots.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore, _bots: &[Bot]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
