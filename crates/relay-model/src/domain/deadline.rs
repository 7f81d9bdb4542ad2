use std::{fmt, time::Duration};

use tokio::time::Instant;

/// Absolute point in time after which work is stale.
///
/// A deadline is computed once per request and copied by value into every unit
/// derived from it. It is never extended or cancelled; every consumer compares
/// the same instant against its own reading of the clock.
///
/// The instant comes from the tokio clock, so paused-time tests observe it too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    /// Deadline at an explicit instant.
    pub const fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Underlying instant, e.g. for `tokio::time::timeout_at`.
    #[inline]
    pub const fn instant(&self) -> Instant {
        self.0
    }

    /// Returns `true` once `now >= deadline`.
    #[inline]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Time left before expiry, zero if already expired.
    #[inline]
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deadline(remaining_ms={})", self.remaining().as_millis())
    }
}
