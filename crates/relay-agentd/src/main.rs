mod cli;
mod source;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use relay_core::{
    ChannelSink, DecimalExpander, MultiSink, Pipeline, SinkHandle, StageContext, TracingSink,
};
use relay_observe::{LoggerTimeZone, init_local_offset, init_logger};
use relay_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
use tokio::io::{AsyncWriteExt, BufReader};

use crate::{
    cli::{AgentConfig, CliArgs},
    source::Source,
};

/// Capacity of the channel feeding `--print-events`.
const EVENT_BUFFER: usize = 1024;

fn main() -> anyhow::Result<()> {
    let cfg = AgentConfig::try_from(CliArgs::parse())?;

    // offset detection must happen before the runtime spawns threads
    if cfg.logger.tz == LoggerTimeZone::Local {
        init_local_offset();
    }
    init_logger(&cfg.logger)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?
        .block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    let metrics = PrometheusMetrics::new()?;

    let mut sinks = MultiSink::new().with(Arc::new(TracingSink));
    let printer = if cfg.print_events {
        let (sink, mut events) = ChannelSink::new(EVENT_BUFFER);
        sinks = sinks.with(Arc::new(sink));
        Some(tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(event) = events.recv().await {
                let mut line = serde_json::to_vec(&event)?;
                line.push(b'\n');
                stdout.write_all(&line).await?;
            }
            stdout.flush().await?;
            anyhow::Ok(())
        }))
    } else {
        None
    };

    let sink: SinkHandle = Arc::new(sinks);
    let ctx = StageContext::new(sink, Arc::new(metrics.clone()));
    let pipeline = Pipeline::start(&cfg.pipeline, Arc::new(DecimalExpander::new()), ctx)?;

    let source = if cfg.ids.is_empty() {
        Source::Lines(BufReader::new(tokio::io::stdin()))
    } else {
        Source::Ids(cfg.ids.clone())
    };
    let drained = source::feed_and_drain(pipeline, source).await;

    // the printer ends once the pipeline, the last holder of the sink, is gone
    if let Some(printer) = printer {
        printer.await.context("event printer panicked")??;
    }

    if cfg.dump_metrics {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&buffer).await?;
        stdout.flush().await?;
    }

    drained?;
    Ok(())
}
