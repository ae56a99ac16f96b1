//! Pushes locally queued records to the remote store.
//!
//! Each pass pushes the three collections concurrently. Within a collection
//! records are upserted oldest-enqueued first and each one leaves the local
//! queue only after its own upsert succeeded, so a partially failed pass never
//! drops unsent records. Passes may overlap: a replayed upsert overwrites the same
//! document and a repeated local removal is a no-op.
//!
//! A record deleted while its upsert is in flight would otherwise reappear once
//! the upsert lands. Deletes are recorded with `mark_deleted`; a pass skips
//! marked records and removes any it already pushed from the remote store.
//!
//! Conflict policy is last writer wins by full overwrite. The coordinator only
//! pushes; it never pulls remote documents into the local queue.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::Notify;

use super::connectivity::Connectivity;
use super::sync_model::{CollectionSyncResult, SyncReport};
use crate::errors::Error;
use crate::queue::LocalQueue;
use crate::records::{document_id, Collection};
use crate::remote::RemoteStore;

pub struct SyncCoordinator {
    remote: Arc<dyn RemoteStore>,
    queue: LocalQueue,
    connectivity: Connectivity,
    nudge: Notify,
    // Ids are never reassigned, so entries never expire.
    deleted: Mutex<HashSet<(Collection, String)>>,
}

impl SyncCoordinator {
    pub fn new(remote: Arc<dyn RemoteStore>, queue: LocalQueue, connectivity: Connectivity) -> Self {
        Self {
            remote,
            queue,
            connectivity,
            nudge: Notify::new(),
            deleted: Mutex::new(HashSet::new()),
        }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn queue(&self) -> &LocalQueue {
        &self.queue
    }

    /// Asks the background scheduler for a pass as soon as possible.
    pub fn request_sync(&self) {
        self.nudge.notify_one();
    }

    /// Resolves after the next `request_sync` call (or immediately if one is
    /// already pending).
    pub async fn sync_requested(&self) {
        self.nudge.notified().await;
    }

    /// Records that a record was deleted so no pass pushes it again.
    pub fn mark_deleted(&self, collection: Collection, id: &str) {
        self.deleted_guard().insert((collection, id.to_string()));
    }

    /// Lifts a `mark_deleted` record, for when the same id is stored again.
    pub fn clear_deleted(&self, collection: Collection, id: &str) {
        self.deleted_guard().remove(&(collection, id.to_string()));
    }

    fn is_deleted(&self, collection: Collection, id: &str) -> bool {
        self.deleted_guard().contains(&(collection, id.to_string()))
    }

    fn deleted_guard(&self) -> MutexGuard<'_, HashSet<(Collection, String)>> {
        self.deleted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Checks reachability and updates the connectivity flag.
    pub async fn probe(&self) -> bool {
        let result = self.remote.ping().await;
        self.connectivity.observe(&result);
        if let Err(e) = &result {
            debug!("Remote probe failed: {}", e);
        }
        self.connectivity.is_online()
    }

    /// Runs one pass over every collection.
    ///
    /// When the store is already known to be offline the pass starts with a
    /// probe and is skipped if the store is still unreachable.
    pub async fn run_pass(&self) -> SyncReport {
        if !self.connectivity.is_online() && !self.probe().await {
            debug!("Sync pass skipped: remote store offline");
            return SyncReport::offline();
        }

        let collections = join_all(
            Collection::ALL
                .into_iter()
                .map(|collection| self.sync_collection(collection)),
        )
        .await;

        let report = SyncReport {
            online: self.connectivity.is_online(),
            collections,
        };
        if report.synced_total() > 0 || report.failed_total() > 0 {
            info!(
                "Sync pass finished: {} synced, {} still pending",
                report.synced_total(),
                report.failed_total()
            );
        }
        report
    }

    async fn sync_collection(&self, collection: Collection) -> CollectionSyncResult {
        let pending = self.queue.pending(collection);
        let mut result = CollectionSyncResult::empty(collection);
        if pending.is_empty() {
            return result;
        }
        result.pending = pending.len();
        info!(
            "Syncing {} local {} to remote store...",
            pending.len(),
            collection
        );

        // The queue holds newest first; push oldest first.
        let mut remaining = pending.len();
        for document in pending.into_iter().rev() {
            remaining -= 1;
            let Some(id) = document_id(&document).map(str::to_string) else {
                warn!("Skipping queued {} record without an id", collection);
                result.failed += 1;
                continue;
            };

            if self.is_deleted(collection, &id) {
                self.queue.remove(collection, &id);
                debug!("Dropped deleted {} {} from the queue", collection, id);
                continue;
            }

            let outcome = self.remote.upsert(collection, &id, document).await;
            self.connectivity.observe(&outcome);
            match outcome {
                Ok(()) => {
                    self.queue.remove(collection, &id);
                    if self.is_deleted(collection, &id) {
                        self.retract(collection, &id).await;
                        continue;
                    }
                    result.synced += 1;
                    debug!("Synced {} {}", collection, id);
                }
                Err(e) if e.is_remote_unavailable() => {
                    warn!("Failed to sync {} {}: {}", collection, id, e);
                    // Store went away; leave the rest for the next pass.
                    result.failed += 1 + remaining;
                    break;
                }
                Err(e) => {
                    error!("Failed to sync {} {}: {}", collection, id, e);
                    result.failed += 1;
                }
            }
        }
        result
    }

    /// Removes a record that was deleted while its upsert was in flight.
    async fn retract(&self, collection: Collection, id: &str) {
        let outcome = self.remote.delete(collection, id).await;
        self.connectivity.observe(&outcome);
        match outcome {
            Ok(()) => info!(
                "Removed {} {} from remote store, deleted during sync",
                collection, id
            ),
            Err(Error::NotFound(_)) => {
                debug!("{} {} already gone from remote store", collection, id)
            }
            Err(e) => error!(
                "Failed to remove deleted {} {} from remote store: {}",
                collection, id, e
            ),
        }
    }
}
