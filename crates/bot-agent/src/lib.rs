//! `bot-agent` — Structure-of-Arrays body storage for the `rust_bots` core.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`store`]     | `AgentStore` (SoA arrays), handle resolution, proximity scans |
//! | [`builder`]   | `AgentStoreBuilder` (fluent construction)                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.     |
//!
//! The store mirrors what the host world knows about every body in the
//! match, bots and humans alike.  The host writes it between ticks; bots
//! only read it.  Other agents are always referenced through
//! [`AgentHandle`](bot_core::AgentHandle)s, which stop resolving once the
//! agent dies.

pub mod builder;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use store::{AgentStore, CROUCH_EYE_HEIGHT, EYE_HEIGHT, MAX_HEALTH};
