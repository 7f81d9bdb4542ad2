use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    BudgetMs,
    error::{ModelError, ModelResult},
    strategy::BoundedStrategy,
};

/// Default per-request time allowance.
pub const DEFAULT_BUDGET_MS: BudgetMs = 100;

/// Default hand-off queue capacity.
///
/// One slot is the closest a bounded tokio channel gets to an unbuffered hand-off.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;

/// Pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Time allowance for a request's whole generate, deliver and execute lifecycle.
    pub budget_ms: BudgetMs,
    /// Capacity of the hand-off queue between the stages; also bounds the request input.
    pub queue_capacity: usize,
    /// How the generation step enforces the deadline.
    pub strategy: BoundedStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            budget_ms: DEFAULT_BUDGET_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            strategy: BoundedStrategy::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document, filling missing fields with defaults, and validate it.
    pub fn from_json(s: &str) -> ModelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ModelError::Invalid(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Budget as a [`Duration`].
    #[inline]
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    /// Validate the configuration.
    ///
    /// Rules:
    /// - `budget_ms` is not zero.
    /// - `queue_capacity` is not zero.
    pub fn validate(&self) -> ModelResult<()> {
        if self.budget_ms == 0 {
            return Err(ModelError::InvalidBudget);
        }
        if self.queue_capacity == 0 {
            return Err(ModelError::InvalidCapacity);
        }
        Ok(())
    }
}
