use relay_model::Request;

use crate::expand::{ExpandError, Expander};

/// Upper bound on the fan-out a single request may ask for.
pub const DEFAULT_FAN_OUT_LIMIT: u64 = 1 << 20;

/// Reference expander: yields the decimal strings `"0"` through `"fan_out - 1"`.
#[derive(Debug, Clone, Copy)]
pub struct DecimalExpander {
    limit: u64,
}

impl DecimalExpander {
    /// Expander with [`DEFAULT_FAN_OUT_LIMIT`].
    pub const fn new() -> Self {
        Self {
            limit: DEFAULT_FAN_OUT_LIMIT,
        }
    }

    /// Expander rejecting requests whose fan-out exceeds `limit`.
    pub const fn with_limit(limit: u64) -> Self {
        Self { limit }
    }
}

impl Default for DecimalExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl Expander for DecimalExpander {
    fn name(&self) -> &'static str {
        "decimal"
    }

    fn expand(&self, request: &Request) -> Result<Vec<String>, ExpandError> {
        if request.fan_out > self.limit {
            return Err(ExpandError::FanOutTooLarge {
                requested: request.fan_out,
                limit: self.limit,
            });
        }
        Ok((0..request.fan_out).map(|i| i.to_string()).collect())
    }
}
