use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// How a bounded operation enforces its deadline.
///
/// Strategies:
/// - `Inline`: check the clock at entry, run the function on the caller, discard an overrun result.
///   Cannot interrupt the function; suited to cheap work with bounded runtime.
/// - `Race`: run the function on the blocking pool and race it against a timer.
///   Returns at the deadline even if the function is still running; the stale result is discarded.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoundedStrategy {
    /// Synchronous check-then-run.
    #[default]
    Inline,
    /// Concurrent run raced against the deadline.
    Race,
}

impl BoundedStrategy {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundedStrategy::Inline => "inline",
            BoundedStrategy::Race => "race",
        }
    }
}

impl FromStr for BoundedStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" | "sync" | "" => Ok(BoundedStrategy::Inline),
            "race" | "spawn" => Ok(BoundedStrategy::Race),
            other => Err(ModelError::UnknownStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for BoundedStrategy {
    type Error = ModelError;
    fn try_from(s: String) -> ModelResult<Self> {
        s.parse()
    }
}

impl From<BoundedStrategy> for String {
    fn from(s: BoundedStrategy) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for BoundedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_inline() {
        assert_eq!(BoundedStrategy::default(), BoundedStrategy::Inline);
    }

    #[test]
    fn parses_aliases_case_insensitive() {
        assert_eq!("INLINE".parse::<BoundedStrategy>().unwrap(), BoundedStrategy::Inline);
        assert_eq!(" sync ".parse::<BoundedStrategy>().unwrap(), BoundedStrategy::Inline);
        assert_eq!("Race".parse::<BoundedStrategy>().unwrap(), BoundedStrategy::Race);
        assert_eq!("spawn".parse::<BoundedStrategy>().unwrap(), BoundedStrategy::Race);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = "parallel".parse::<BoundedStrategy>().unwrap_err();
        assert!(matches!(err, ModelError::UnknownStrategy(s) if s == "parallel"));
    }

    #[test]
    fn serde_uses_canonical_names() {
        assert_eq!(serde_json::to_string(&BoundedStrategy::Race).unwrap(), r#""race""#);

        let parsed: BoundedStrategy = serde_json::from_str(r#""Inline""#).unwrap();
        assert_eq!(parsed, BoundedStrategy::Inline);

        assert!(serde_json::from_str::<BoundedStrategy>(r#""nope""#).is_err());
    }
}
