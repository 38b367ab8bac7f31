use bot_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("profile parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("movement error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
