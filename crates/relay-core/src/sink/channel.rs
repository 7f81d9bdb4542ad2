use async_trait::async_trait;
use relay_model::PipelineEvent;
use tokio::sync::mpsc;
use tracing::debug;

use crate::sink::EventSink;

/// Sink forwarding events into a bounded channel owned by the caller.
///
/// A full channel applies backpressure to the emitting stage. Events are dropped once the
/// receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<PipelineEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PipelineEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Wrap an existing sender.
    pub fn from_sender(tx: mpsc::Sender<PipelineEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: PipelineEvent) {
        if let Err(e) = self.tx.send(event).await {
            debug!(kind = e.0.kind(), "event receiver dropped; event discarded");
        }
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}
