//! Expander abstraction used by the generator stage to derive unit payloads from a request.
//!
//! Concrete expanders implement this trait and are handed to the pipeline at start-up.
mod error;
pub use error::ExpandError;

mod decimal;
pub use decimal::{DEFAULT_FAN_OUT_LIMIT, DecimalExpander};

use relay_model::Request;

/// Derives the payloads of a request's units.
///
/// An expander is responsible for:
/// - producing the values in the order they must be executed;
/// - reporting failures unrelated to timing as [`ExpandError`].
///
/// Expansion runs under the request deadline. With the race strategy it runs on the blocking
/// pool and may be abandoned mid-way, so it must be free of side effects that matter.
pub trait Expander: Send + Sync + 'static {
    /// Expander name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Produce the unit payloads for `request`.
    fn expand(&self, request: &Request) -> Result<Vec<String>, ExpandError>;
}
