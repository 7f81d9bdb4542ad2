mod deadline;
pub use deadline::Deadline;

mod request;
pub use request::Request;

mod unit;
pub use unit::Unit;

/// Identifier of a submitted request.
///
/// Carried by every unit derived from the request and by every event emitted for it.
pub type RequestId = u64;

/// Time allowance in milliseconds.
///
/// Used in pipeline configuration where a per-request budget is required.
pub type BudgetMs = u64;
