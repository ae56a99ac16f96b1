use serde::Serialize;

use crate::records::Collection;

/// Outcome of pushing one collection's pending records.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSyncResult {
    pub collection: Collection,
    pub pending: usize,
    pub synced: usize,
    pub failed: usize,
}

impl CollectionSyncResult {
    pub fn empty(collection: Collection) -> Self {
        Self {
            collection,
            pending: 0,
            synced: 0,
            failed: 0,
        }
    }
}

/// Outcome of one sync pass over every collection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// False when the pass was skipped because the remote store was unreachable.
    pub online: bool,
    pub collections: Vec<CollectionSyncResult>,
}

impl SyncReport {
    pub fn offline() -> Self {
        Self {
            online: false,
            collections: Vec::new(),
        }
    }

    pub fn synced_total(&self) -> usize {
        self.collections.iter().map(|c| c.synced).sum()
    }

    pub fn failed_total(&self) -> usize {
        self.collections.iter().map(|c| c.failed).sum()
    }

    pub fn for_collection(&self, collection: Collection) -> Option<&CollectionSyncResult> {
        self.collections.iter().find(|c| c.collection == collection)
    }
}
