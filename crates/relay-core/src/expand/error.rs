use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("fan-out {requested} exceeds limit {limit}")]
    FanOutTooLarge { requested: u64, limit: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}
