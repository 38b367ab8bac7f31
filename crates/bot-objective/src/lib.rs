//! `bot-objective` — scenario objectives and the event feed that drives them.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`event`]     | `GameEvent`, `TimedEvent`, `EventFeed` (tick-ordered queue)   |
//! | [`objective`] | `Objective`, `ObjectiveKind`, `CarryState`                   |
//! | [`tracker`]   | `ObjectiveTracker`: applies events, answers validity queries |
//! | [`error`]     | `ObjectiveError`, `ObjectiveResult<T>`                       |
//!
//! # Ownership
//!
//! Only the host's event layer mutates objectives, by pushing events into
//! the feed.  The simulation drains the feed once per tick before any bot
//! runs, so every bot sees the same snapshot for the whole tick.  Bots keep
//! [`ObjectiveHandle`](bot_core::ObjectiveHandle)s and must resolve them
//! each tick; a destroyed or respawned objective stops resolving.

pub mod error;
pub mod event;
pub mod objective;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use error::{ObjectiveError, ObjectiveResult};
pub use event::{EventFeed, GameEvent, TimedEvent};
pub use objective::{CarryState, Objective, ObjectiveKind};
pub use tracker::{ObjectiveTracker, RoundPhase};
