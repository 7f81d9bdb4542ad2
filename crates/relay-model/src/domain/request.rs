use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RequestId;

/// Request submitted to the pipeline.
///
/// `fan_out` is the number of units the generator derives from the request.
/// [`Request::new`] uses the id as the fan-out count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub fan_out: u64,
}

impl Request {
    /// Request whose fan-out equals its id.
    pub const fn new(id: RequestId) -> Self {
        Self { id, fan_out: id }
    }

    /// Request with an explicit fan-out count.
    pub const fn with_fan_out(id: RequestId, fan_out: u64) -> Self {
        Self { id, fan_out }
    }
}

impl From<RequestId> for Request {
    fn from(id: RequestId) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request(id={}, fan_out={})", self.id, self.fan_out)
    }
}
