//! Metrics collection abstraction for the pipeline stages.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected via
//! [`crate::StageContext`].
mod backend;
pub use backend::{GenerationOutcome, MetricsBackend, MetricsHandle, UnitOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
