use async_trait::async_trait;
use relay_model::PipelineEvent;

use crate::sink::{EventSink, SinkHandle};

/// Sink that delivers every event to each inner sink, in registration order.
#[derive(Default, Clone)]
pub struct MultiSink {
    sinks: Vec<SinkHandle>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink and return `self` for chaining.
    pub fn with(mut self, sink: SinkHandle) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventSink for MultiSink {
    async fn emit(&self, event: PipelineEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone()).await;
            }
            last.emit(event).await;
        }
    }

    fn name(&self) -> &'static str {
        "multi"
    }
}
