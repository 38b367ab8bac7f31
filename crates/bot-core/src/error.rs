//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into `BotError`
//! via `From` impls or keep them separate.  Nothing in the decision core is
//! fatal to the host: errors surface as values and end in a behavior change.

use thiserror::Error;

use crate::{AgentId, NodeId};

/// The top-level error type for `bot-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `bot-*` crates.
pub type BotResult<T> = Result<T, BotError>;
