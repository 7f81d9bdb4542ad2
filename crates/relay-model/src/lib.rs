mod domain;
pub use domain::{BudgetMs, Deadline, Request, RequestId, Unit};

mod error;
pub use error::{ModelError, ModelResult};

mod event;
pub use event::{FailureCause, PipelineEvent};

mod config;
pub use config::{DEFAULT_BUDGET_MS, DEFAULT_QUEUE_CAPACITY, PipelineConfig};

mod strategy;
pub use strategy::BoundedStrategy;
