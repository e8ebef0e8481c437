use serde::{Deserialize, Serialize};

/// Identifier of one series fetch, increasing in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Last-request-wins bookkeeping for superseded fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    /// Issues a new id; every earlier id becomes stale.
    pub fn begin(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    #[must_use]
    pub fn latest(self) -> Option<RequestId> {
        (self.latest > 0).then_some(RequestId(self.latest))
    }

    #[must_use]
    pub fn is_current(self, id: RequestId) -> bool {
        id.0 == self.latest
    }
}
