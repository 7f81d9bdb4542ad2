use std::sync::atomic::{AtomicU64, Ordering};

/// Global monotonically increasing sequence for pipeline identifiers.
///
/// Local to the current process.
static PIPELINE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Build a human-readable pipeline id used in tracing spans.
///
/// Format: `{expander}-{seq:x}`.
pub fn make_pipeline_id(expander: &str) -> String {
    let seq = PIPELINE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{expander}-{seq:x}")
}
