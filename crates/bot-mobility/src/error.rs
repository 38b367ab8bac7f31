use bot_nav::NavError;
use thiserror::Error;

/// Why a path stopped being followed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathFailure {
    #[error("no path to follow")]
    NoPath,

    #[error("no waypoint reached within the progress timeout")]
    Timeout,

    #[error("fell below the path")]
    Fell,

    #[error("a node on the path was blocked")]
    Blocked,

    #[error("still stuck after every recovery attempt")]
    StuckRetriesExhausted,

    #[error("ladder traversal aborted")]
    LadderAborted,
}

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("routing failed: {0}")]
    Routing(#[from] NavError),

    #[error("repath requested {remaining:.2}s before the cool-down ends")]
    Throttled { remaining: f32 },

    #[error("path following failed: {0}")]
    Failed(#[from] PathFailure),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
