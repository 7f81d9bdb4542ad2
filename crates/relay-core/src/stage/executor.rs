use relay_model::{PipelineEvent, Unit};
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace};

use crate::{
    context::StageContext,
    metrics::UnitOutcome,
    stage::as_millis,
};

/// Per-run counters returned when the executor stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorStats {
    /// Units whose effect ran before the deadline.
    pub completed: u64,
    /// Units dropped as stale.
    pub expired: u64,
}

impl ExecutorStats {
    /// Units examined in total.
    #[inline]
    pub fn examined(&self) -> u64 {
        self.completed + self.expired
    }
}

/// Executor stage: re-validates each unit's deadline and runs its effect while it is still fresh.
pub struct Executor {
    ctx: StageContext,
}

impl Executor {
    pub fn new(ctx: StageContext) -> Self {
        Self { ctx }
    }

    /// Consume units until the hand-off queue is closed and drained.
    #[instrument(level = "debug", name = "executor", skip_all)]
    pub async fn run(self, mut units: mpsc::Receiver<Unit>) -> ExecutorStats {
        debug!("executor started");
        let mut stats = ExecutorStats::default();

        while let Some(unit) = units.recv().await {
            match self.execute(unit).await {
                UnitOutcome::Completed => stats.completed += 1,
                UnitOutcome::Expired => stats.expired += 1,
            }
        }

        debug!(?stats, "executor stopped");
        stats
    }

    /// Attempt one unit exactly once.
    ///
    /// A unit examined at or after its deadline is dropped without an event. Otherwise the
    /// completion event is delivered to the sink in full; a slow sink applies backpressure
    /// to this stage but never turns a started delivery into an expiry.
    pub async fn execute(&self, unit: Unit) -> UnitOutcome {
        let Unit {
            request_id,
            value,
            deadline,
        } = unit;
        let slack_ms = as_millis(deadline.remaining());

        let outcome = if deadline.is_expired() {
            trace!(request_id, value = %value, "unit stale on arrival; dropped");
            UnitOutcome::Expired
        } else {
            self.ctx
                .sink()
                .emit(PipelineEvent::UnitCompleted { request_id, value })
                .await;
            UnitOutcome::Completed
        };

        self.ctx.metrics().record_unit(outcome, slack_ms);
        outcome
    }
}
