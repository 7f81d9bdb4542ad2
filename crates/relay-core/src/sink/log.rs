use async_trait::async_trait;
use relay_model::PipelineEvent;
use tracing::{info, warn};

use crate::sink::EventSink;

/// Sink that writes every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn emit(&self, event: PipelineEvent) {
        log_event(&event);
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

fn log_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::GenerationFailed { request_id, cause } => warn!(
            request_id = *request_id,
            cause = cause.as_label(),
            reason = %cause,
            "generation failed"
        ),
        PipelineEvent::GenerationComplete { request_id, units } => {
            info!(request_id = *request_id, units = *units, "generation complete")
        }
        PipelineEvent::UnitCompleted { request_id, value } => {
            info!(request_id = *request_id, value = %value, "unit completed")
        }
    }
}
