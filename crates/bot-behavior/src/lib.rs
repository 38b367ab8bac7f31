//! `bot-behavior` — behavior stack, finite state layer, and the bot brain.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`action`]  | `ActionNode` catalog, `ActionResult`, `Query`, `QueryAnswer`       |
//! | [`stack`]   | `BehaviorStack` — suspend/resume, change, done, abort semantics   |
//! | [`state`]   | `StateMachine`, `StateTag`, `Transition`, the eight states        |
//! | [`brain`]   | `Brain` — perception, aim, path follower, tactical scalars        |
//! | [`bot`]     | `Bot` — brain plus stack; per-tick update and event handling      |
//! | [`context`] | `BotContext<'a>` — read-only tick snapshot shared by all bots     |
//! | [`world`]   | `WorldQuery` trait, `WeaponStatus`, `WorldView` adapter           |
//! | [`command`] | `BotCommand`, `WeaponCommand` — a bot's output for one tick       |
//! | [`profile`] | `BotProfile`, `Disposition`, CSV profile loader                   |
//! | [`config`]  | `BehaviorConfig`, `BotConfig`                                     |
//! | [`error`]   | `BehaviorError`, `BehaviorResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on configs and commands.   |
//!
//! # Design notes
//!
//! Each tick a bot (1) refreshes perception, (2) asks its stack whether to
//! engage the recognized enemy, (3) updates the stack outermost node first,
//! and (4) returns the `BotCommand` assembled along the way.  Everything the
//! bot reads goes through `&BotContext`; everything it writes lives in its
//! own `Brain` and stack, so bots can be updated in parallel.

pub mod action;
pub mod bot;
pub mod brain;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod profile;
pub mod stack;
pub mod state;
pub mod world;

#[cfg(test)]
mod tests;

pub use action::{ActionNode, ActionResult, Query, QueryAnswer};
pub use bot::Bot;
pub use brain::{Brain, Task};
pub use command::{BotCommand, WeaponCommand};
pub use config::{BehaviorConfig, BotConfig};
pub use context::BotContext;
pub use error::{BehaviorError, BehaviorResult};
pub use profile::{load_profiles_csv, load_profiles_reader, BotProfile, Disposition};
pub use stack::BehaviorStack;
pub use state::{HideRequest, HoldMode, MoveGoal, MoveTask, Next, StateMachine, StateTag, Transition};
pub use world::{WeaponStatus, WorldQuery, WorldView};
