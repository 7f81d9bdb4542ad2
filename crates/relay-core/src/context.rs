use std::{fmt, sync::Arc};

use crate::{
    metrics::{MetricsHandle, noop_metrics},
    sink::{SinkHandle, TracingSink},
};

/// Shared dependencies handed to both pipeline stages.
#[derive(Clone)]
pub struct StageContext {
    sink: SinkHandle,
    metrics: MetricsHandle,
}

impl StageContext {
    /// Create a new stage context with the given params.
    pub fn new(sink: SinkHandle, metrics: MetricsHandle) -> Self {
        Self { sink, metrics }
    }

    /// Get a reference to the event sink.
    pub fn sink(&self) -> &SinkHandle {
        &self.sink
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the event sink and return updated context.
    pub fn with_sink(mut self, sink: SinkHandle) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for StageContext {
    fn default() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            metrics: noop_metrics(),
        }
    }
}

impl fmt::Debug for StageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageContext")
            .field("sink", &self.sink.name())
            .field("metrics", &"<handle>")
            .finish()
    }
}

impl fmt::Display for StageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StageContext(sink={})", self.sink.name())
    }
}
