//! Request sources for the agent: command-line ids or newline-delimited stdin.
use anyhow::{Context, bail};
use relay_core::{Pipeline, PipelineReport};
use relay_model::{Request, RequestId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Where the agent takes request ids from.
pub enum Source<R> {
    /// Ids given on the command line.
    Ids(Vec<RequestId>),
    /// Newline-delimited ids, read until end of input.
    Lines(R),
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<Request>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let id = trimmed
        .parse::<u64>()
        .with_context(|| format!("invalid request id {trimmed:?}"))?;
    Ok(Some(Request::new(id)))
}

/// Submit every id from `reader` as it arrives; returns the number of requests submitted.
///
/// Stops at end of input. Submission waits while the pipeline input is full.
pub async fn feed_lines<R>(pipeline: &Pipeline, reader: R) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut submitted = 0;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let request = match parse_line(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => bail!("line {line_no}: {e:#}"),
        };
        pipeline.submit(request).await?;
        submitted += 1;
    }

    debug!(submitted, "request source exhausted");
    Ok(submitted)
}

/// Submit everything `source` yields, then drain `pipeline`.
///
/// The pipeline is drained even when the source fails part-way; the source error is returned
/// once every submitted unit has completed or expired.
pub async fn feed_and_drain<R>(
    pipeline: Pipeline,
    source: Source<R>,
) -> anyhow::Result<PipelineReport>
where
    R: AsyncBufRead + Unpin,
{
    let fed = match source {
        Source::Ids(ids) => feed_ids(&pipeline, &ids).await,
        Source::Lines(reader) => feed_lines(&pipeline, reader).await,
    };
    if let Err(e) = &fed {
        warn!(error = %format!("{e:#}"), "request source failed; draining pipeline");
    }

    let report = pipeline.shutdown().await?;
    info!(?report, "pipeline drained");
    fed?;
    Ok(report)
}

async fn feed_ids(pipeline: &Pipeline, ids: &[RequestId]) -> anyhow::Result<u64> {
    for id in ids {
        pipeline.submit(*id).await?;
    }
    Ok(ids.len() as u64)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use relay_core::{ChannelSink, DecimalExpander, StageContext};
    use relay_model::{PipelineConfig, PipelineEvent};

    use super::*;

    #[test]
    fn parses_ids_and_skips_blank_lines() {
        assert_eq!(parse_line(" 7 ").unwrap(), Some(Request::new(7)));
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("# comment").unwrap(), None);
        assert!(parse_line("-3").is_err());
        assert!(parse_line("five").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn feeds_every_line_then_stops() {
        let (sink, mut events) = ChannelSink::new(64);
        let ctx = StageContext::default().with_sink(Arc::new(sink));
        let pipeline = Pipeline::start(
            &PipelineConfig::default(),
            Arc::new(DecimalExpander::new()),
            ctx,
        )
        .unwrap();

        let input: &[u8] = b"2\n\n1\n";
        let submitted = feed_lines(&pipeline, input).await.unwrap();
        assert_eq!(submitted, 2);

        let report = pipeline.shutdown().await.unwrap();
        assert_eq!(report.executor.completed, 3);

        let mut completed = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, PipelineEvent::UnitCompleted { .. }) {
                completed += 1;
            }
        }
        assert_eq!(completed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_line_reports_its_position() {
        let pipeline = Pipeline::start(
            &PipelineConfig::default(),
            Arc::new(DecimalExpander::new()),
            StageContext::default(),
        )
        .unwrap();

        let input: &[u8] = b"1\nnope\n";
        let err = feed_lines(&pipeline, input).await.unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));

        pipeline.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_input_still_drains_submitted_requests() {
        let (sink, mut events) = ChannelSink::new(64);
        let ctx = StageContext::default().with_sink(Arc::new(sink));
        let pipeline = Pipeline::start(
            &PipelineConfig::default(),
            Arc::new(DecimalExpander::new()),
            ctx,
        )
        .unwrap();

        let input: &[u8] = b"5\nnope\n";
        let err = feed_and_drain(pipeline, Source::Lines(input)).await.unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));

        let mut values = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let PipelineEvent::UnitCompleted { request_id: 5, value } = event {
                values.push(value);
            }
        }
        assert_eq!(values, ["0", "1", "2", "3", "4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn command_line_ids_are_submitted_in_order() {
        let (sink, mut events) = ChannelSink::new(64);
        let ctx = StageContext::default().with_sink(Arc::new(sink));
        let pipeline = Pipeline::start(
            &PipelineConfig::default(),
            Arc::new(DecimalExpander::new()),
            ctx,
        )
        .unwrap();

        let source: Source<&[u8]> = Source::Ids(vec![2, 0, 1]);
        let report = feed_and_drain(pipeline, source).await.unwrap();
        assert_eq!(report.generator.requests, 3);
        assert_eq!(report.executor.completed, 3);

        let mut order = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let PipelineEvent::GenerationComplete { request_id, .. } = event {
                order.push(request_id);
            }
        }
        assert_eq!(order, [2, 0, 1]);
    }
}
