//! `bot-core` — foundational types for the `rust_bots` decision core.
//!
//! This crate is a dependency of every other `bot-*` crate.  It intentionally
//! has no `bot-*` dependencies and minimal external ones (`glam`, `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `LinkId`, `ObjectiveId`, generational handles |
//! | [`geo`]         | `Vec3` re-export, yaw/field-of-view/segment helpers       |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`, `CountdownTimer`, `IntervalTimer` |
//! | [`rng`]         | `AgentRng` (per-agent, deterministic)                     |
//! | [`team`]        | `Team` enum                                               |
//! | [`noise`]       | `NoiseKind`                                               |
//! | [`error`]       | `BotError`, `BotResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod noise;
pub mod rng;
pub mod team;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BotError, BotResult};
pub use geo::{Vec2, Vec3};
pub use ids::{AgentHandle, AgentId, EdgeId, LinkId, NodeId, ObjectiveHandle, ObjectiveId};
pub use noise::NoiseKind;
pub use rng::AgentRng;
pub use team::Team;
pub use time::{CountdownTimer, IntervalTimer, SimClock, SimConfig, Tick};
