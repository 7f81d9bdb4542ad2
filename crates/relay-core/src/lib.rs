pub mod bounded;
pub mod error;
pub mod expand;
pub mod metrics;
pub mod pipeline;
pub mod sink;
pub mod stage;

mod context;
pub use context::StageContext;

pub use bounded::{BoundedResult, run_bounded, run_inline, run_race};
pub use error::{CoreError, GenerationError};
pub use expand::{DecimalExpander, ExpandError, Expander};
pub use metrics::{
    GenerationOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, UnitOutcome, noop_metrics,
};
pub use pipeline::{Pipeline, PipelineReport, Submitter};
pub use sink::{ChannelSink, EventSink, MultiSink, SinkHandle, TracingSink};
pub use stage::{Executor, ExecutorStats, Generator, GeneratorStats};

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::expand::{Expander, ExpandError};
    pub use crate::pipeline::Pipeline;
    pub use crate::sink::EventSink;
    pub use crate::StageContext;
}
