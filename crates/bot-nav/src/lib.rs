//! `bot-nav` — navigation graph, routing, and paths.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                         |
//! |------------|------------------------------------------------------------------|
//! | [`graph`]  | `NavGraph` (area nodes, CSR edges, ladders, R-tree), `NavGraphBuilder` |
//! | [`router`] | `Router` trait, `Route`, `RouteMode`, `AStarRouter`              |
//! | [`path`]   | `Path`, `Waypoint`, `Traversal` — followable routes              |
//! | [`spot`]   | hiding-spot search bounded by travel distance                   |
//! | [`error`]  | `NavError`, `NavResult<T>`                                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |
//!
//! The graph contents (areas, connectivity, ladders, visibility) are
//! produced by the host's map tooling; this crate only stores and queries
//! them.  A built `NavGraph` is immutable and shared read-only by every bot.

pub mod error;
pub mod graph;
pub mod path;
pub mod router;
pub mod spot;


pub use error::{NavError, NavResult};
pub use graph::{EdgeKind, HidingSpot, LadderLink, NavGraph, NavGraphBuilder, NodeFlags, SpotFlags};
pub use path::{LadderMode, Path, Traversal, Waypoint};
pub use router::{AStarRouter, Route, RouteMode, Router, RouterConfig};
pub use spot::{find_hiding_spot, SpotQuery};
