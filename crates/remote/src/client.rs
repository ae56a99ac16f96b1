//! REST client for a hosted document store.

use std::time::Duration;

use async_trait::async_trait;
use clubsite_core::{
    records::{Collection, Document},
    remote::RemoteStore,
};
use log::{debug, warn};

use crate::error::{RemoteClientError, Result};
use crate::types::{DocumentQuery, ErrorResponse};

/// Default timeout for store requests.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// `RemoteStore` backed by another club-site server's document API.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    /// Create a client for the store at `base_url` (e.g. "https://club.example.org").
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteClientError::Config(format!(
                "Remote URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/api/v1/documents/{}", self.base_url, collection.as_str())
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(id)
        )
    }

    /// Turn a non-success response into an API error.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("Store response ({}): {}", status, body);
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => error.message,
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => format!("Request failed: {}", body),
        };
        Err(RemoteClientError::api(status.as_u16(), message))
    }

    /// PUT /api/v1/documents/{collection}/{id}
    pub async fn put_document(
        &self,
        collection: Collection,
        id: &str,
        document: &Document,
    ) -> Result<()> {
        let url = self.document_url(collection, id);
        debug!("Upserting {} {} at {}", collection, id, url);
        let response = self.client.put(&url).json(document).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// DELETE /api/v1/documents/{collection}/{id}
    pub async fn delete_document(&self, collection: Collection, id: &str) -> Result<()> {
        let url = self.document_url(collection, id);
        debug!("Deleting {} {} at {}", collection, id, url);
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// GET /api/v1/documents/{collection}
    pub async fn list_documents(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>> {
        let url = format!(
            "{}?{}",
            self.collection_url(collection),
            query.to_query_string()
        );
        let response = Self::check(self.client.get(&url).send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to decode {} listing from {}: {}", collection, url, e);
            RemoteClientError::Json(e)
        })
    }

    /// GET /api/v1/healthz
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/api/v1/healthz", self.base_url);
        Self::check(self.client.get(&url).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for HttpDocumentStore {
    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> clubsite_core::Result<()> {
        Ok(self.put_document(collection, id, &document).await?)
    }

    async fn delete(&self, collection: Collection, id: &str) -> clubsite_core::Result<()> {
        Ok(self.delete_document(collection, id).await?)
    }

    async fn query_ordered_desc(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> clubsite_core::Result<Vec<Document>> {
        Ok(self
            .list_documents(collection, &DocumentQuery::ordered(order_field))
            .await?)
    }

    async fn query_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        order_field: &str,
    ) -> clubsite_core::Result<Vec<Document>> {
        Ok(self
            .list_documents(
                collection,
                &DocumentQuery::matching(field, value, order_field),
            )
            .await?)
    }

    async fn ping(&self) -> clubsite_core::Result<()> {
        Ok(self.health().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            HttpDocumentStore::new("ftp://club"),
            Err(RemoteClientError::Config(_))
        ));
    }

    #[test]
    fn builds_document_urls() {
        let store = HttpDocumentStore::new("http://localhost:3000/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(
            store.document_url(Collection::Comments, "a/b"),
            "http://localhost:3000/api/v1/documents/comments/a%2Fb"
        );
    }
}
