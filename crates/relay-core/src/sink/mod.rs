//! Event sinks: where the pipeline surfaces its outward events.
//!
//! The pipeline emits [`PipelineEvent`]s and is otherwise silent. Sinks are injected via
//! [`crate::StageContext`] and shared by both stages.
mod channel;
pub use channel::ChannelSink;

mod multi;
pub use multi::MultiSink;

mod log;
pub use log::TracingSink;

use std::sync::Arc;

use async_trait::async_trait;
use relay_model::PipelineEvent;

/// Receiver of pipeline events.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Deliver one event.
    ///
    /// The executor bounds this call by the unit deadline; a sink that cannot accept the event
    /// in time causes the unit to count as expired.
    async fn emit(&self, event: PipelineEvent);

    /// Sink name used in logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Shared handle to an event sink.
pub type SinkHandle = Arc<dyn EventSink>;
