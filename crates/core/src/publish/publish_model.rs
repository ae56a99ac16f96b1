use serde::Serialize;

use crate::constants::QUEUED_LOCALLY_MESSAGE;

/// Where a newly written record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishOutcome {
    /// Confirmed by the remote store.
    Stored,
    /// The remote store was unreachable; the record waits in the local queue.
    Queued,
}

#[derive(Debug, Clone)]
pub struct Published<R> {
    pub record: R,
    pub outcome: PublishOutcome,
}

impl<R> Published<R> {
    pub fn is_queued(&self) -> bool {
        self.outcome == PublishOutcome::Queued
    }

    /// Informational message for the caller, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.is_queued().then_some(QUEUED_LOCALLY_MESSAGE)
    }
}

/// Which copies a delete removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub remote: bool,
    pub local: bool,
}
