//! `bot-sim` — fixed-tick orchestrator for the rust_bots decision core.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Events    — drain the EventFeed; Damage/Kill hit the AgentStore,
//!                 objective events hit the ObjectiveTracker, then every
//!                 bot's on_event sees each event.
//!   ② Decide    — Bot::update for every bot against one read-only
//!                 BotContext: perception, stack, states, path following
//!                 (parallel with the `parallel` feature).
//!   ③ Apply     — for each command in ascending AgentId order:
//!                 skip dead bodies, otherwise LocomotionSink::apply.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the decision phase on Rayon's thread pool.        |
//! | `fx-hash`  | FxHash for the per-tick state histogram.               |
//! | `serde`    | Propagates serde derives to all `bot-*` types.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bot_agent::AgentStoreBuilder;
//! use bot_core::{SimConfig, Team, Vec3};
//! use bot_nav::AStarRouter;
//! use bot_sim::{KinematicSink, NoopObserver, SimBuilder};
//!
//! let agents = AgentStoreBuilder::new()
//!     .spawn_many(5, Team::Red, Vec3::new(0.0, 0.0, 0.0))
//!     .spawn_many(5, Team::Blue, Vec3::new(80.0, 0.0, 0.0))
//!     .build();
//! let mut sim = SimBuilder::new(config, agents, AStarRouter::default(), world, KinematicSink::default())
//!     .graph(graph)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod locomotion;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use locomotion::{KinematicSink, LocomotionSink};
pub use observer::{NoopObserver, SimObserver, StateCounts, TickSummary};
pub use sim::Sim;
