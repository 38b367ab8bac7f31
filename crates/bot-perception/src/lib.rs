//! `bot-perception` — what a bot knows about the bodies and sounds around it.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`config`]     | `PerceptionConfig` (all tuning constants)                   |
//! | [`threat`]     | `ThreatRecord`                                              |
//! | [`reaction`]   | `ReactionQueue` ring buffer, `reaction_steps`               |
//! | [`notice`]     | noticeability score                                         |
//! | [`memory`]     | `NoiseMemory`, `AttackerMemory`                             |
//! | [`aim`]        | `AimModel`: focus-dependent aim error                       |
//! | [`perception`] | `Perception` (per-bot record), `Sight` trait, `PerceptionInput` |
//!
//! # Pipeline
//!
//! Each tick, [`Perception::update`] filters enemies by field of view, range
//! and line of sight, rolls each against its noticeability, and pushes the
//! most dangerous noticed one (or nothing) into the reaction queue.  The
//! recognized enemy is the record written `reaction_steps` ticks earlier, so
//! bots react with a skill-dependent, human-like latency.

pub mod aim;
pub mod config;
pub mod memory;
pub mod notice;
pub mod perception;
pub mod reaction;
pub mod threat;


pub use aim::AimModel;
pub use config::PerceptionConfig;
pub use memory::{AttackerMemory, HeardNoise, NoiseMemory};
pub use notice::noticeability;
pub use perception::{Perception, PerceptionInput, Sight};
pub use reaction::{reaction_steps, ReactionQueue};
pub use threat::ThreatRecord;
