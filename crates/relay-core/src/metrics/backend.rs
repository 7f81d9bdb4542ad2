use std::sync::Arc;

/// How the generation step for one request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// All units were enqueued.
    Complete,
    /// The deadline passed before expansion finished.
    Expired,
    /// The expander reported an error.
    Failed,
}

impl GenerationOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            GenerationOutcome::Complete => "complete",
            GenerationOutcome::Expired => "expired",
            GenerationOutcome::Failed => "failed",
        }
    }
}

/// How the executor disposed of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The unit was fresh and its event was delivered.
    Completed,
    /// The unit was stale when the executor examined it.
    Expired,
}

impl UnitOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitOutcome::Completed => "completed",
            UnitOutcome::Expired => "expired",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected via [`crate::StageContext`] and called by both stages.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the end of a request's generation step.
    ///
    /// # Arguments
    /// - `outcome`: How generation ended
    /// - `units`: Units enqueued for the request (zero unless `Complete`)
    /// - `duration_ms`: Time from deadline computation to the last enqueue
    fn record_generation(&self, outcome: GenerationOutcome, units: usize, duration_ms: u64);
    /// Record the executor's decision for one unit.
    ///
    /// # Arguments
    /// - `outcome`: Whether the effect ran
    /// - `slack_ms`: Time left before the deadline when the executor examined the unit
    fn record_unit(&self, outcome: UnitOutcome, slack_ms: u64);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
