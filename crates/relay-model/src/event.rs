use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RequestId;

/// Why a request produced no units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "reason")]
pub enum FailureCause {
    /// Generation did not finish before the request deadline.
    Expired,
    /// The expander reported an error.
    Failed(String),
}

impl FailureCause {
    /// Bounded label value for logs and metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureCause::Expired => "expired",
            FailureCause::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Expired => f.write_str("deadline expired during generation"),
            FailureCause::Failed(reason) => write!(f, "expansion failed: {reason}"),
        }
    }
}

/// Event surfaced by the pipeline to its sink.
///
/// Units dropped for staleness produce no event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum PipelineEvent {
    /// A request was abandoned without emitting units.
    #[serde(rename_all = "camelCase")]
    GenerationFailed {
        request_id: RequestId,
        cause: FailureCause,
    },
    /// Every unit of a request has been enqueued.
    #[serde(rename_all = "camelCase")]
    GenerationComplete { request_id: RequestId, units: usize },
    /// A unit was executed before its deadline.
    #[serde(rename_all = "camelCase")]
    UnitCompleted { request_id: RequestId, value: String },
}

impl PipelineEvent {
    /// Returns the event kind as a static string.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineEvent::GenerationFailed { .. } => "generation_failed",
            PipelineEvent::GenerationComplete { .. } => "generation_complete",
            PipelineEvent::UnitCompleted { .. } => "unit_completed",
        }
    }

    /// Request the event belongs to.
    pub fn request_id(&self) -> RequestId {
        match self {
            PipelineEvent::GenerationFailed { request_id, .. }
            | PipelineEvent::GenerationComplete { request_id, .. }
            | PipelineEvent::UnitCompleted { request_id, .. } => *request_id,
        }
    }
}
