use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("budget must be greater than zero milliseconds")]
    InvalidBudget,

    #[error("queue capacity must be greater than zero")]
    InvalidCapacity,

    #[error("unknown bounded strategy: {0}")]
    UnknownStrategy(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
