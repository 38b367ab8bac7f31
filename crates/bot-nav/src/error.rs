//! Navigation error type.

use thiserror::Error;

use bot_core::{NodeId, Vec3};

/// Planning failures produced by `bot-nav`.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("search from {from} to {to} exceeded its budget after {expanded} nodes")]
    SearchBudgetExceeded { from: NodeId, to: NodeId, expanded: usize },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("position {0} is not on the navigation graph")]
    OffGraph(Vec3),

    #[error("route contains no nodes")]
    EmptyRoute,
}

pub type NavResult<T> = Result<T, NavError>;
