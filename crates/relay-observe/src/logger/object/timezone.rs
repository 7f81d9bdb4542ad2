use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::logger::LoggerError;

/// Local offset captured by [`init_local_offset`] or on first use.
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone of log timestamps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    /// UTC (default, always available).
    #[default]
    Utc,
    /// System timezone, falling back to UTC when it cannot be detected.
    Local,
}

impl LoggerTimeZone {
    /// Offset to apply to timestamps.
    pub fn offset(&self) -> UtcOffset {
        match self {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => *LOCAL_OFFSET.get_or_init(detect_local_offset),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// Capture the local UTC offset.
///
/// Call in `main()` before the tokio runtime spawns threads: most Unix platforms refuse
/// offset detection in multi-threaded processes. Falls back to UTC silently.
///
/// # Example
/// ```no_run
/// fn main() {
///     relay_observe::init_local_offset();
///     // build the async runtime afterwards
/// }
/// ```
pub fn init_local_offset() {
    let _ = LOCAL_OFFSET.set(detect_local_offset());
}

fn detect_local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}
