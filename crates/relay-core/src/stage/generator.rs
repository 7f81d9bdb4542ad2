use std::{sync::Arc, time::Duration};

use relay_model::{
    BoundedStrategy, Deadline, FailureCause, PipelineConfig, PipelineEvent, Request, Unit,
};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, error, instrument, trace};

use crate::{
    bounded::{BoundedResult, run_bounded},
    context::StageContext,
    error::GenerationError,
    expand::{ExpandError, Expander},
    metrics::GenerationOutcome,
    stage::as_millis,
};

/// Per-run counters returned when the generator stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorStats {
    /// Requests pulled from the input.
    pub requests: u64,
    /// Requests whose units were all enqueued.
    pub completed: u64,
    /// Requests abandoned because the deadline passed during expansion.
    pub expired: u64,
    /// Requests abandoned because the expander failed.
    pub failed: u64,
    /// Units enqueued across all completed requests.
    pub units: u64,
}

/// Generator stage: expands requests into units stamped with the request deadline.
pub struct Generator {
    expander: Arc<dyn Expander>,
    strategy: BoundedStrategy,
    budget: Duration,
    ctx: StageContext,
}

impl Generator {
    pub fn new(
        expander: Arc<dyn Expander>,
        strategy: BoundedStrategy,
        budget: Duration,
        ctx: StageContext,
    ) -> Self {
        Self {
            expander,
            strategy,
            budget,
            ctx,
        }
    }

    /// Build a generator from the budget and strategy of `cfg`.
    pub fn from_config(
        cfg: &PipelineConfig,
        expander: Arc<dyn Expander>,
        ctx: StageContext,
    ) -> Self {
        Self::new(expander, cfg.strategy, cfg.budget(), ctx)
    }

    /// Pull requests until the input is closed and drained, then close the hand-off queue.
    ///
    /// A failed or expired request is reported and skipped. The loop stops early only if the
    /// hand-off queue is closed underneath it.
    #[instrument(
        level = "debug",
        name = "generator",
        skip_all,
        fields(expander = self.expander.name(), strategy = %self.strategy)
    )]
    pub async fn run(
        self,
        mut requests: mpsc::Receiver<Request>,
        units: mpsc::Sender<Unit>,
    ) -> GeneratorStats {
        debug!(budget_ms = as_millis(self.budget), "generator started");
        let mut stats = GeneratorStats::default();

        while let Some(request) = requests.recv().await {
            stats.requests += 1;
            match self.process(request, &units).await {
                Ok(n) => {
                    stats.completed += 1;
                    stats.units += n as u64;
                }
                Err(GenerationError::Expired) => stats.expired += 1,
                Err(GenerationError::Failed(_)) => stats.failed += 1,
                Err(GenerationError::QueueClosed) => {
                    error!(request_id = request.id, "hand-off queue closed; generator stopping");
                    break;
                }
            }
        }

        drop(units);
        debug!(?stats, "generator stopped");
        stats
    }

    /// Expand one request under a fresh deadline and enqueue its units.
    ///
    /// Returns the number of units enqueued. Waits while the hand-off queue is full.
    pub async fn process(
        &self,
        request: Request,
        units: &mpsc::Sender<Unit>,
    ) -> Result<usize, GenerationError> {
        let started = Instant::now();
        let deadline = Deadline::after(self.budget);

        let values = match self.generate(request, deadline).await {
            BoundedResult::Completed(Ok(values)) => values,
            BoundedResult::Completed(Err(e)) => {
                let cause = FailureCause::Failed(e.to_string());
                self.report_failure(request, cause, started).await;
                return Err(GenerationError::Failed(e));
            }
            BoundedResult::Expired => {
                self.report_failure(request, FailureCause::Expired, started).await;
                return Err(GenerationError::Expired);
            }
        };

        let count = values.len();
        for value in values {
            trace!(request_id = request.id, value = %value, "enqueue unit");
            units
                .send(Unit::new(request.id, value, deadline))
                .await
                .map_err(|_| GenerationError::QueueClosed)?;
        }

        self.ctx.metrics().record_generation(
            GenerationOutcome::Complete,
            count,
            as_millis(started.elapsed()),
        );
        self.ctx
            .sink()
            .emit(PipelineEvent::GenerationComplete {
                request_id: request.id,
                units: count,
            })
            .await;
        Ok(count)
    }

    async fn generate(
        &self,
        request: Request,
        deadline: Deadline,
    ) -> BoundedResult<Result<Vec<String>, ExpandError>> {
        let expander = Arc::clone(&self.expander);
        run_bounded(self.strategy, deadline, move || expander.expand(&request)).await
    }

    async fn report_failure(&self, request: Request, cause: FailureCause, started: Instant) {
        let outcome = match cause {
            FailureCause::Expired => GenerationOutcome::Expired,
            FailureCause::Failed(_) => GenerationOutcome::Failed,
        };
        debug!(request_id = request.id, cause = cause.as_label(), "request abandoned");

        self.ctx
            .metrics()
            .record_generation(outcome, 0, as_millis(started.elapsed()));
        self.ctx
            .sink()
            .emit(PipelineEvent::GenerationFailed {
                request_id: request.id,
                cause,
            })
            .await;
    }
}
