//! `bot-mobility` — turning a goal position into per-tick locomotion input.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`follower`] | `PathFollower` (compute/follow/destroy), `PathStatus`, `ObstacleProbe`, `MoveContext` |
//! | [`ladder`]   | `LadderTraversal` sub-state machine                               |
//! | [`stuck`]    | `StuckMonitor` — rolling-window stuck detection                   |
//! | [`command`]  | `MoveCommand`, `MoveSpeed` — output handed to the host            |
//! | [`body`]     | `BodyState` — kinematic snapshot read each tick                   |
//! | [`config`]   | `MobilityConfig`                                                  |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`, `PathFailure`               |
//!
//! # Movement model
//!
//! Bots never move themselves.  Each tick the follower reads a
//! [`BodyState`], advances along its [`Path`](bot_nav::Path) and emits a
//! [`MoveCommand`]; the host applies it to the physical body, and the next
//! tick observes the result.  Planning failures surface as
//! [`MobilityError`]; execution failures as [`PathStatus::Failed`].

pub mod body;
pub mod command;
pub mod config;
pub mod error;
pub mod follower;
pub mod ladder;
pub mod stuck;

#[cfg(test)]
mod tests;

pub use body::BodyState;
pub use command::{MoveCommand, MoveSpeed};
pub use config::MobilityConfig;
pub use error::{MobilityError, MobilityResult, PathFailure};
pub use follower::{MoveContext, ObstacleProbe, OpenGround, PathFollower, PathStatus};
pub use ladder::{LadderPhase, LadderStep, LadderTraversal};
pub use stuck::StuckMonitor;
