use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Hands out time-based record ids: milliseconds since the epoch as a decimal
/// string. Ids are strictly increasing per generator, so two records created
/// in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now())
    }

    pub fn next_id_at(&self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(candidate.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        candidate.max(previous + 1).to_string()
    }
}
