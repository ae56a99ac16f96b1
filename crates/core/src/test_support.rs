//! In-memory doubles shared by the core unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::errors::{Error, Result};
use crate::queue::BucketStore;
use crate::records::{document_id, field_equals, sort_desc_by_field, Collection, Document};
use crate::remote::RemoteStore;

/// Document with `id`, and `date`/`timestamp` both set to `at`.
pub fn doc(id: &str, at: &str) -> Document {
    match json!({ "id": id, "date": at, "timestamp": at }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[derive(Default)]
pub struct MemoryBuckets {
    values: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
}

impl MemoryBuckets {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl BucketStore for MemoryBuckets {
    fn read(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Storage("read refused".into()));
        }
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.put_raw(key, value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.values.write().unwrap().remove(key);
        Ok(())
    }
}

/// Remote store double with an offline switch and per-id rejection.
#[derive(Default)]
pub struct FakeRemote {
    documents: RwLock<HashMap<Collection, Vec<Document>>>,
    offline: AtomicBool,
    reject_all: AtomicBool,
    rejected_ids: RwLock<HashSet<String>>,
    upserts: RwLock<Vec<String>>,
}

impl FakeRemote {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn reject_all(&self, reject: bool) {
        self.reject_all.store(reject, Ordering::SeqCst);
    }

    pub fn reject_id(&self, id: &str) {
        self.rejected_ids.write().unwrap().insert(id.to_string());
    }

    /// `collection/id` of every successful upsert, in call order.
    pub fn upsert_log(&self) -> Vec<String> {
        self.upserts.read().unwrap().clone()
    }

    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        self.documents
            .read()
            .unwrap()
            .get(&collection)
            .is_some_and(|docs| docs.iter().any(|d| document_id(d) == Some(id)))
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::remote_unavailable("offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn upsert(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        self.check_online()?;
        if self.reject_all.load(Ordering::SeqCst) || self.rejected_ids.read().unwrap().contains(id)
        {
            return Err(Error::Unexpected(format!("write rejected for {}", id)));
        }
        let mut all = self.documents.write().unwrap();
        let docs = all.entry(collection).or_default();
        match docs.iter_mut().find(|d| document_id(d) == Some(id)) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }
        self.upserts
            .write()
            .unwrap()
            .push(format!("{}/{}", collection, id));
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.check_online()?;
        let mut all = self.documents.write().unwrap();
        let docs = all.entry(collection).or_default();
        let before = docs.len();
        docs.retain(|d| document_id(d) != Some(id));
        if docs.len() == before {
            return Err(Error::not_found(format!("{}/{}", collection, id)));
        }
        Ok(())
    }

    async fn query_ordered_desc(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        self.check_online()?;
        let mut docs = self
            .documents
            .read()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default();
        sort_desc_by_field(&mut docs, order_field);
        Ok(docs)
    }

    async fn query_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let mut docs = self.query_ordered_desc(collection, order_field).await?;
        docs.retain(|d| field_equals(d, field, value));
        Ok(docs)
    }
}

/// `FakeRemote` whose upserts announce themselves on `entered` and then wait
/// for `release` before writing.
#[derive(Default)]
pub struct GatedRemote {
    pub inner: FakeRemote,
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl RemoteStore for GatedRemote {
    async fn upsert(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.upsert(collection, id, document).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.inner.delete(collection, id).await
    }

    async fn query_ordered_desc(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        self.inner.query_ordered_desc(collection, order_field).await
    }

    async fn query_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        self.inner
            .query_where(collection, field, value, order_field)
            .await
    }
}
