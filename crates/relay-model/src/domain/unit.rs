use crate::{Deadline, RequestId};

/// Derived piece of work travelling from the generator to the executor.
///
/// Moved through the hand-off queue; the executor consumes it exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    /// Request this unit was derived from.
    pub request_id: RequestId,
    /// Payload produced by the expander.
    pub value: String,
    /// Copy of the originating request's deadline.
    pub deadline: Deadline,
}

impl Unit {
    pub fn new(request_id: RequestId, value: impl Into<String>, deadline: Deadline) -> Self {
        Self {
            request_id,
            value: value.into(),
            deadline,
        }
    }
}
