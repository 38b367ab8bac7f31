use thiserror::Error;

use bot_core::ObjectiveId;

#[derive(Debug, Error)]
pub enum ObjectiveError {
    #[error("event refers to unknown objective {0}")]
    Unknown(ObjectiveId),

    #[error("objective id {0} is out of range")]
    OutOfRange(ObjectiveId),
}

pub type ObjectiveResult<T> = Result<T, ObjectiveError>;
