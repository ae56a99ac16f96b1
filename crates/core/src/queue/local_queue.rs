//! Durable client-side staging area for records not yet confirmed by the
//! remote store.
//!
//! Every operation is whole-bucket: read the serialized sequence, change it,
//! write it back. The backing store is assumed available; read or parse
//! failures degrade to an empty sequence and write failures are logged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde_json::Value;

use super::queue_traits::BucketStore;
use crate::records::{document_id, Collection, Document};

#[derive(Clone)]
pub struct LocalQueue {
    store: Arc<dyn BucketStore>,
    // Serializes read-modify-write cycles within this process.
    lock: Arc<Mutex<()>>,
}

impl LocalQueue {
    pub fn new(store: Arc<dyn BucketStore>) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Puts `document` at the front of the collection's sequence.
    pub fn enqueue(&self, collection: Collection, document: Document) {
        self.with_bucket(collection, |bucket| {
            bucket.insert(0, document);
            true
        });
    }

    /// Returns every staged document for `collection` and clears the bucket.
    pub fn drain(&self, collection: Collection) -> Vec<Document> {
        let _guard = self.guard();
        let documents = self.load(collection);
        if let Err(e) = self.store.delete(collection.bucket_key()) {
            warn!(
                "Failed to clear local bucket {}: {}",
                collection.bucket_key(),
                e
            );
        }
        documents
    }

    /// Removes the document with `id`. Returns false when nothing was staged
    /// under that id; that is not an error.
    pub fn remove(&self, collection: Collection, id: &str) -> bool {
        self.with_bucket(collection, |bucket| {
            let before = bucket.len();
            bucket.retain(|doc| document_id(doc) != Some(id));
            bucket.len() != before
        })
    }

    /// Snapshot of the staged documents, front (newest) first.
    pub fn pending(&self, collection: Collection) -> Vec<Document> {
        let _guard = self.guard();
        self.load(collection)
    }

    pub fn pending_counts(&self) -> HashMap<Collection, usize> {
        Collection::ALL
            .iter()
            .map(|c| (*c, self.pending(*c).len()))
            .collect()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // Buckets are written whole, so a poisoned lock leaves no torn state.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_bucket<F>(&self, collection: Collection, op: F) -> bool
    where
        F: FnOnce(&mut Vec<Document>) -> bool,
    {
        let _guard = self.guard();
        let mut bucket = self.load(collection);
        let changed = op(&mut bucket);
        if changed {
            self.persist(collection, &bucket);
        }
        changed
    }

    fn load(&self, collection: Collection) -> Vec<Document> {
        let key = collection.bucket_key();
        let raw = match self.store.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read local bucket {}: {}", key, e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => values
                .into_iter()
                .filter_map(|value| match value {
                    Value::Object(map) => Some(map),
                    other => {
                        warn!("Skipping non-object entry in {}: {}", key, other);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!("Local bucket {} is not a JSON array: {}", key, e);
                Vec::new()
            }
        }
    }

    fn persist(&self, collection: Collection, bucket: &[Document]) {
        let key = collection.bucket_key();
        let serialized = match serde_json::to_string(bucket) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize local bucket {}: {}", key, e);
                return;
            }
        };
        match self.store.write(key, &serialized) {
            Ok(()) => debug!("Persisted {} record(s) to {}", bucket.len(), key),
            Err(e) => warn!("Failed to write local bucket {}: {}", key, e),
        }
    }
}
