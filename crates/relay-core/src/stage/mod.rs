//! The two pipeline stages.
//!
//! Both stages are plain async loops over tokio channels. They share nothing but the hand-off
//! queue and the [`crate::StageContext`]; the only temporal state crossing the queue is the
//! [`relay_model::Deadline`] copied into each unit.
mod generator;
pub use generator::{Generator, GeneratorStats};

mod executor;
pub use executor::{Executor, ExecutorStats};

use std::time::Duration;

/// Milliseconds in `d`, saturating at `u64::MAX`.
#[inline]
pub(crate) fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
