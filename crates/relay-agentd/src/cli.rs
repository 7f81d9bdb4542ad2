use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use relay_model::{BoundedStrategy, PipelineConfig, RequestId};
use relay_observe::{LoggerConfig, LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Command-line and environment settings of `relay-agentd`.
///
/// Pipeline flags override the values of `--config` when both are given.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "relay-agentd",
    version,
    about = "Expand numbers into deadline-bounded units of work and execute them"
)]
pub struct CliArgs {
    /// Request ids to submit. When empty, ids are read from stdin, one per line.
    pub ids: Vec<RequestId>,

    /// JSON file with a pipeline configuration (`budgetMs`, `queueCapacity`, `strategy`).
    #[arg(long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Time allowance per request in milliseconds.
    #[arg(long, env = "RELAY_BUDGET_MS")]
    pub budget_ms: Option<u64>,

    /// Capacity of the hand-off queue between generator and executor.
    #[arg(long, env = "RELAY_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Deadline enforcement for generation: `inline` or `race`.
    #[arg(long, env = "RELAY_STRATEGY")]
    pub strategy: Option<BoundedStrategy>,

    /// Log format: `text`, `json` or `journald`.
    #[arg(long, env = "RELAY_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Log filter expression, e.g. `info` or `relay_core=debug,info`.
    #[arg(long, env = "RELAY_LOG", default_value = "info")]
    pub log_level: LoggerLevel,

    /// Timezone of log timestamps: `utc` or `local`.
    #[arg(long, env = "RELAY_LOG_TZ", default_value = "utc")]
    pub log_tz: LoggerTimeZone,

    /// Print every pipeline event to stdout as a JSON line.
    #[arg(long, default_value_t = false)]
    pub print_events: bool,

    /// Print prometheus metrics to stdout after the pipeline drained.
    #[arg(long, default_value_t = false)]
    pub dump_metrics: bool,
}

/// Resolved agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub pipeline: PipelineConfig,
    pub logger: LoggerConfig,
    pub ids: Vec<RequestId>,
    pub print_events: bool,
    pub dump_metrics: bool,
}

impl TryFrom<CliArgs> for AgentConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let mut pipeline = match &args.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                PipelineConfig::from_json(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => PipelineConfig::default(),
        };

        if let Some(budget_ms) = args.budget_ms {
            pipeline.budget_ms = budget_ms;
        }
        if let Some(capacity) = args.queue_capacity {
            pipeline.queue_capacity = capacity;
        }
        if let Some(strategy) = args.strategy {
            pipeline.strategy = strategy;
        }
        pipeline.validate()?;

        let logger = LoggerConfig {
            format: args.log_format,
            level: args.log_level,
            tz: args.log_tz,
            ..Default::default()
        };

        Ok(Self {
            pipeline,
            logger,
            ids: args.ids,
            print_events: args.print_events,
            dump_metrics: args.dump_metrics,
        })
    }
}
