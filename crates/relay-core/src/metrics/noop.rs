use crate::metrics::backend::{GenerationOutcome, MetricsBackend, UnitOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_generation(&self, _: GenerationOutcome, _: usize, _: u64) {}

    #[inline(always)]
    fn record_unit(&self, _: UnitOutcome, _: u64) {}
}
