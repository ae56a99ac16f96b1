use async_trait::async_trait;

use crate::errors::Result;
use crate::records::{Collection, Document};

/// Capability interface of the remote document store.
///
/// Every method may fail with `Error::RemoteUnavailable`, which callers treat
/// as "retry later". `upsert` always replaces the whole document. Ordered
/// queries return newest first on `order_field`, ties in store insertion order.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn upsert(&self, collection: Collection, id: &str, document: Document) -> Result<()>;

    /// Fails with `Error::NotFound` when no document has `id`.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    async fn query_ordered_desc(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>>;

    async fn query_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        order_field: &str,
    ) -> Result<Vec<Document>>;

    /// Cheap reachability probe.
    async fn ping(&self) -> Result<()> {
        self.query_ordered_desc(Collection::Newsletters, "timestamp")
            .await
            .map(|_| ())
    }
}
