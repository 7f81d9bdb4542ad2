//! Pipeline orchestrator: wires the request input, the generator, the hand-off queue and the
//! executor together.
//!
//! - Owns the bounded hand-off queue between the stages.
//! - Spawns both stages as independent tokio tasks.
//! - Shutdown closes the request input and waits for both stages to drain; nothing in flight is
//!   discarded by the orchestrator itself.
mod id;
pub use id::make_pipeline_id;

use std::sync::Arc;

use relay_model::{PipelineConfig, Request};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{Instrument, debug, info, info_span, instrument};

use crate::{
    context::StageContext,
    error::CoreError,
    expand::Expander,
    stage::{Executor, ExecutorStats, Generator, GeneratorStats},
};

/// Final counters of a drained pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    pub generator: GeneratorStats,
    pub executor: ExecutorStats,
}

/// Cloneable handle for submitting requests from additional producers.
///
/// The pipeline drains only after every submitter has been dropped.
#[derive(Debug, Clone)]
pub struct Submitter {
    tx: mpsc::Sender<Request>,
}

impl Submitter {
    /// Submit a request, waiting while the request input is full.
    pub async fn submit(&self, request: impl Into<Request>) -> Result<(), CoreError> {
        self.tx
            .send(request.into())
            .await
            .map_err(|_| CoreError::Closed)
    }
}

/// Running two-stage pipeline.
pub struct Pipeline {
    id: String,
    submitter: Submitter,
    generator: JoinHandle<GeneratorStats>,
    executor: JoinHandle<ExecutorStats>,
}

impl Pipeline {
    /// Validate `cfg` and spawn both stages on the current tokio runtime.
    pub fn start(
        cfg: &PipelineConfig,
        expander: Arc<dyn Expander>,
        ctx: StageContext,
    ) -> Result<Self, CoreError> {
        cfg.validate()?;

        let id = make_pipeline_id(expander.name());
        let (request_tx, request_rx) = mpsc::channel(cfg.queue_capacity);
        let (unit_tx, unit_rx) = mpsc::channel(cfg.queue_capacity);

        let generator = Generator::from_config(cfg, expander, ctx.clone());
        let executor = Executor::new(ctx);

        let span = info_span!("pipeline", id = %id);
        let generator = tokio::spawn(generator.run(request_rx, unit_tx).instrument(span.clone()));
        let executor = tokio::spawn(executor.run(unit_rx).instrument(span));

        info!(
            pipeline = %id,
            budget_ms = cfg.budget_ms,
            queue_capacity = cfg.queue_capacity,
            strategy = %cfg.strategy,
            "pipeline started"
        );
        Ok(Self {
            id,
            submitter: Submitter { tx: request_tx },
            generator,
            executor,
        })
    }

    /// Start a pipeline, submit every request of `requests` in order, then drain it.
    pub async fn run<I>(
        cfg: &PipelineConfig,
        expander: Arc<dyn Expander>,
        ctx: StageContext,
        requests: I,
    ) -> Result<PipelineReport, CoreError>
    where
        I: IntoIterator,
        I::Item: Into<Request>,
    {
        let pipeline = Self::start(cfg, expander, ctx)?;
        for request in requests {
            pipeline.submit(request).await?;
        }
        pipeline.shutdown().await
    }

    /// Pipeline identifier used in logs.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Submit a request, waiting while the request input is full.
    pub async fn submit(&self, request: impl Into<Request>) -> Result<(), CoreError> {
        self.submitter.submit(request).await
    }

    /// Handle for additional producers.
    pub fn submitter(&self) -> Submitter {
        self.submitter.clone()
    }

    /// Close the request input and wait for both stages to drain.
    ///
    /// Units already enqueued still complete or expire on their own deadlines.
    #[instrument(level = "debug", skip(self), fields(pipeline = %self.id))]
    pub async fn shutdown(self) -> Result<PipelineReport, CoreError> {
        let Self {
            id,
            submitter,
            generator,
            executor,
        } = self;
        drop(submitter);
        debug!("request input closed; draining");

        let generator = generator
            .await
            .map_err(|_| CoreError::StagePanicked("generator"))?;
        let executor = executor
            .await
            .map_err(|_| CoreError::StagePanicked("executor"))?;

        let report = PipelineReport {
            generator,
            executor,
        };
        info!(
            pipeline = %id,
            requests = report.generator.requests,
            units = report.generator.units,
            completed = report.executor.completed,
            expired = report.executor.expired,
            "pipeline drained"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use relay_model::{BoundedStrategy, FailureCause, ModelError, PipelineEvent, RequestId};

    use super::*;
    use crate::{
        expand::{DecimalExpander, ExpandError},
        sink::{ChannelSink, EventSink},
        stage::ExecutorStats,
    };

    fn context() -> (StageContext, mpsc::Receiver<PipelineEvent>) {
        let (sink, events) = ChannelSink::new(1024);
        (StageContext::default().with_sink(Arc::new(sink)), events)
    }

    fn collect(events: &mut mpsc::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
        let mut out = Vec::new();
        while let Ok(e) = events.try_recv() {
            out.push(e);
        }
        out
    }

    fn completed_values(events: &[PipelineEvent], id: u64) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::UnitCompleted { request_id, value } if *request_id == id => {
                    Some(value.clone())
                }
                _ => None,
            })
            .collect()
    }

    struct DelayedExpander(Duration);

    impl Expander for DelayedExpander {
        fn name(&self) -> &'static str {
            "delayed"
        }

        fn expand(&self, request: &Request) -> Result<Vec<String>, ExpandError> {
            std::thread::sleep(self.0);
            DecimalExpander::new().expand(request)
        }
    }

    /// Forwards every event, then blocks the caller after delivering a unit of `stall_on`.
    struct StallingSink {
        inner: ChannelSink,
        stall_on: RequestId,
        stall: Duration,
    }

    #[async_trait]
    impl EventSink for StallingSink {
        async fn emit(&self, event: PipelineEvent) {
            let stall = matches!(
                event,
                PipelineEvent::UnitCompleted { request_id, .. } if request_id == self.stall_on
            );
            self.inner.emit(event).await;
            if stall {
                tokio::time::sleep(self.stall).await;
            }
        }

        fn name(&self) -> &'static str {
            "stalling"
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn request_within_budget_completes_every_unit() {
        let (ctx, mut events) = context();
        let cfg = PipelineConfig {
            strategy: BoundedStrategy::Race,
            ..Default::default()
        };
        let expander = Arc::new(DelayedExpander(Duration::from_millis(10)));

        let report = Pipeline::run(&cfg, expander, ctx, [5u64]).await.unwrap();

        let events = collect(&mut events);
        assert_eq!(completed_values(&events, 5), ["0", "1", "2", "3", "4"]);
        assert!(!events.iter().any(|e| e.kind() == "generation_failed"));
        assert!(events.contains(&PipelineEvent::GenerationComplete {
            request_id: 5,
            units: 5
        }));
        assert_eq!(report.executor.completed, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delayed_generation_fails_the_request() {
        let (ctx, mut events) = context();
        let cfg = PipelineConfig {
            strategy: BoundedStrategy::Race,
            ..Default::default()
        };
        let expander = Arc::new(DelayedExpander(Duration::from_millis(200)));

        let report = Pipeline::run(&cfg, expander, ctx, [3u64]).await.unwrap();

        assert_eq!(
            collect(&mut events),
            [PipelineEvent::GenerationFailed {
                request_id: 3,
                cause: FailureCause::Expired
            }]
        );
        assert_eq!(report.generator.expired, 1);
        assert_eq!(report.executor.examined(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_source_drains_and_returns() {
        let (ctx, mut events) = context();
        let report = Pipeline::run(
            &PipelineConfig::default(),
            Arc::new(DecimalExpander::new()),
            ctx,
            [0u64, 1, 2],
        )
        .await
        .unwrap();

        assert_eq!(report.generator.requests, 3);
        assert_eq!(report.generator.completed, 3);
        assert_eq!(report.generator.units, 3);
        assert_eq!(report.executor.completed, 3);

        let events = collect(&mut events);
        assert!(completed_values(&events, 0).is_empty());
        assert_eq!(completed_values(&events, 1), ["0"]);
        assert_eq!(completed_values(&events, 2), ["0", "1"]);
        assert!(events.contains(&PipelineEvent::GenerationComplete {
            request_id: 0,
            units: 0
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_executor_drops_units_of_the_next_request() {
        let (inner, mut events) = ChannelSink::new(1024);
        let sink = StallingSink {
            inner,
            stall_on: 1,
            stall: Duration::from_millis(150),
        };
        let ctx = StageContext::default().with_sink(Arc::new(sink));
        let cfg = PipelineConfig {
            queue_capacity: 4,
            ..Default::default()
        };

        let report = Pipeline::run(&cfg, Arc::new(DecimalExpander::new()), ctx, [1u64, 2])
            .await
            .unwrap();

        assert_eq!(
            report.executor,
            ExecutorStats {
                completed: 1,
                expired: 2
            }
        );

        let events = collect(&mut events);
        assert_eq!(completed_values(&events, 1), ["0"]);
        assert!(completed_values(&events, 2).is_empty());
        assert!(!events.iter().any(|e| e.kind() == "generation_failed"));
        assert!(events.contains(&PipelineEvent::GenerationComplete {
            request_id: 2,
            units: 2
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn enqueued_units_are_examined_exactly_once() {
        let (ctx, mut events) = context();
        let cfg = PipelineConfig {
            queue_capacity: 4,
            ..Default::default()
        };
        let report = Pipeline::run(&cfg, Arc::new(DecimalExpander::new()), ctx, [10u64, 30, 7])
            .await
            .unwrap();

        assert_eq!(report.generator.units, 47);
        assert_eq!(report.executor.examined(), report.generator.units);

        let events = collect(&mut events);
        let expected: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        assert_eq!(completed_values(&events, 30), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn multiple_submitters_share_one_pipeline() {
        let (ctx, mut events) = context();
        let pipeline = Pipeline::start(
            &PipelineConfig::default(),
            Arc::new(DecimalExpander::new()),
            ctx,
        )
        .unwrap();

        let extra = pipeline.submitter();
        let producer = tokio::spawn(async move {
            extra.submit(Request::with_fan_out(100, 2)).await.unwrap();
        });
        pipeline.submit(Request::with_fan_out(200, 3)).await.unwrap();
        producer.await.unwrap();

        let report = pipeline.shutdown().await.unwrap();
        assert_eq!(report.generator.requests, 2);

        let events = collect(&mut events);
        assert_eq!(completed_values(&events, 100), ["0", "1"]);
        assert_eq!(completed_values(&events, 200), ["0", "1", "2"]);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let cfg = PipelineConfig {
            budget_ms: 0,
            ..Default::default()
        };
        let err = Pipeline::start(&cfg, Arc::new(DecimalExpander::new()), StageContext::default())
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::Config(ModelError::InvalidBudget)));
    }

    #[tokio::test]
    async fn panicking_expander_surfaces_on_shutdown() {
        struct Panicking;

        impl Expander for Panicking {
            fn name(&self) -> &'static str {
                "panicking"
            }

            fn expand(&self, _: &Request) -> Result<Vec<String>, ExpandError> {
                panic!("expander bug")
            }
        }

        let pipeline = Pipeline::start(
            &PipelineConfig::default(),
            Arc::new(Panicking),
            StageContext::default(),
        )
        .unwrap();
        pipeline.submit(1u64).await.unwrap();

        let err = pipeline.shutdown().await.unwrap_err();
        assert!(matches!(err, CoreError::StagePanicked("generator")));
    }
}
