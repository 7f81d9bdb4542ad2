//! Bounded operations: run work under a [`Deadline`] and report either its result or expiry.
//!
//! Every call derives its own timer or clock check from the deadline value and disposes of it
//! before returning; nothing cancelable outlives the call.

use relay_model::{BoundedStrategy, Deadline};
use tracing::trace;

/// Outcome of a bounded operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum BoundedResult<T> {
    /// The operation finished before the deadline.
    Completed(T),
    /// The deadline passed first; any late result was discarded.
    Expired,
}

impl<T> BoundedResult<T> {
    /// Returns `true` for [`BoundedResult::Expired`].
    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self, BoundedResult::Expired)
    }

    /// Converts into an `Option`, dropping the expiry distinction.
    #[inline]
    pub fn completed(self) -> Option<T> {
        match self {
            BoundedResult::Completed(v) => Some(v),
            BoundedResult::Expired => None,
        }
    }
}

/// Run `f` on the caller, checking the clock at entry.
///
/// `f` is not started if the deadline already passed. Once started it cannot be interrupted;
/// a result that arrives at or after the deadline is discarded.
pub fn run_inline<T, F>(deadline: Deadline, f: F) -> BoundedResult<T>
where
    F: FnOnce() -> T,
{
    if deadline.is_expired() {
        trace!("deadline passed before inline operation started");
        return BoundedResult::Expired;
    }

    let value = f();
    if deadline.is_expired() {
        trace!("inline operation overran its deadline; result discarded");
        return BoundedResult::Expired;
    }
    BoundedResult::Completed(value)
}

/// Run `f` on the blocking pool and race it against the deadline.
///
/// On expiry the join handle is detached: the computation keeps running in the background
/// and its result is dropped when it arrives, so `f` must not have side effects that matter.
/// A panic inside `f` is resumed on the caller.
pub async fn run_race<T, F>(deadline: Deadline, f: F) -> BoundedResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    if deadline.is_expired() {
        trace!("deadline passed before raced operation started");
        return BoundedResult::Expired;
    }

    let handle = tokio::task::spawn_blocking(f);
    match tokio::time::timeout_at(deadline.instant(), handle).await {
        Ok(Ok(value)) => BoundedResult::Completed(value),
        Ok(Err(e)) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Ok(Err(_)) => BoundedResult::Expired,
        Err(_) => {
            trace!("raced operation still running at deadline; detached");
            BoundedResult::Expired
        }
    }
}

/// Dispatch to [`run_inline`] or [`run_race`] according to `strategy`.
pub async fn run_bounded<T, F>(
    strategy: BoundedStrategy,
    deadline: Deadline,
    f: F,
) -> BoundedResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match strategy {
        BoundedStrategy::Inline => run_inline(deadline, f),
        BoundedStrategy::Race => run_race(deadline, f).await,
    }
}
