use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Validated `EnvFilter` expression.
///
/// Stores the raw string (e.g. `"info"`, `"relay_core=trace,info"`) so it can be serialized
/// back unchanged, and builds the filter on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// Parse and validate a filter expression.
    ///
    /// # Examples
    /// ```
    /// use relay_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("relay_core=debug,info").unwrap();
    /// assert_eq!(lvl.as_str(), "relay_core=debug,info");
    /// assert!(LoggerLevel::new("relay_core=chatty").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        let s = s.into();
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(Self(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter. The expression was validated on construction.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}
