/// Interval between background sync passes.
pub const SYNC_INTERVAL_SECS: u64 = 30;

/// Author shown when a newsletter or comment is submitted without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Location shown when an event is submitted without one.
pub const DEFAULT_EVENT_LOCATION: &str = "TBD";

/// Message returned to callers whose write landed in the local queue.
pub const QUEUED_LOCALLY_MESSAGE: &str = "Saved locally. Will sync when connection restored.";
