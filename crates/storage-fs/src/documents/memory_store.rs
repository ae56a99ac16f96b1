use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use clubsite_core::{
    errors::Error,
    records::{Collection, Document},
    remote::RemoteStore,
    Result,
};

use super::{filtered, ordered, remove_from, upsert_into};
use crate::errors::StorageError;

/// In-memory document store with an offline switch. While offline every call
/// fails with `RemoteUnavailable`, which makes it a stand-in for a hosted
/// store in demos and tests.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    offline: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.is_offline() {
            return Err(Error::remote_unavailable("memory store is offline"));
        }
        Ok(())
    }

    fn snapshot(&self, collection: Collection) -> Result<Vec<Document>> {
        self.check_online()?;
        let collections = self
            .collections
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl RemoteStore for MemoryDocumentStore {
    async fn upsert(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        self.check_online()?;
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        upsert_into(collections.entry(collection).or_default(), id, document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.check_online()?;
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        if remove_from(collections.entry(collection).or_default(), id) {
            Ok(())
        } else {
            Err(Error::not_found(format!("{} {}", collection, id)))
        }
    }

    async fn query_ordered_desc(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        Ok(ordered(self.snapshot(collection)?, order_field))
    }

    async fn query_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        Ok(filtered(self.snapshot(collection)?, field, value, order_field))
    }

    async fn ping(&self) -> Result<()> {
        self.check_online()
    }
}
