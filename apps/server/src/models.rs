use std::collections::BTreeMap;

use clubsite_core::publish::{DeleteOutcome, Published};
use clubsite_core::records::Collection;
use serde::{Deserialize, Serialize};

/// Body returned by the create endpoints: the record itself, plus the queued
/// flag and notice when it only reached the local queue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedResponse<R: Serialize> {
    #[serde(flatten)]
    pub record: R,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub queued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<R: Serialize> From<Published<R>> for PublishedResponse<R> {
    fn from(published: Published<R>) -> Self {
        Self {
            queued: published.is_queued(),
            message: published.notice().map(str::to_string),
            record: published.record,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            success: true,
            outcome,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub online: bool,
    pub pending: BTreeMap<String, usize>,
}

impl SyncStatusResponse {
    pub fn new(online: bool, counts: impl IntoIterator<Item = (Collection, usize)>) -> Self {
        let mut pending: BTreeMap<String, usize> = Collection::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), 0))
            .collect();
        for (collection, count) in counts {
            pending.insert(collection.as_str().to_string(), count);
        }
        Self { online, pending }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Query string of the document listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub order_by: Option<String>,
    pub field: Option<String>,
    pub value: Option<String>,
}
