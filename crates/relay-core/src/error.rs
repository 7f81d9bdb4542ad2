use relay_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] ModelError),

    #[error("pipeline input is closed")]
    Closed,

    #[error("{0} stage panicked")]
    StagePanicked(&'static str),
}

/// Why the generator produced no units for a request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("deadline expired before generation finished")]
    Expired,

    #[error("expansion failed: {0}")]
    Failed(#[from] crate::expand::ExpandError),

    #[error("hand-off queue closed")]
    QueueClosed,
}
