//! Read path: remote first, local queue snapshot when the remote store is
//! unreachable.
//!
//! The two sources are never merged. A device that has queued a record but
//! not yet synced it will not see that record while the remote store answers.

use std::sync::Arc;

use log::{debug, warn};

use super::feed_model::{Feed, FeedSource};
use crate::errors::Result;
use crate::queue::LocalQueue;
use crate::records::{
    field_equals, sort_desc_by_field, Collection, Comment, Document, Event, Newsletter, Record,
};
use crate::remote::RemoteStore;
use crate::sync::Connectivity;

/// Field comments reference their newsletter by.
const COMMENT_PARENT_FIELD: &str = "newsletterId";

pub struct FeedService {
    remote: Arc<dyn RemoteStore>,
    queue: LocalQueue,
    connectivity: Connectivity,
}

impl FeedService {
    pub fn new(remote: Arc<dyn RemoteStore>, queue: LocalQueue, connectivity: Connectivity) -> Self {
        Self {
            remote,
            queue,
            connectivity,
        }
    }

    /// Newsletters newest first, optionally filtered by a search term
    /// matched against author, title and content.
    pub async fn newsletters(&self, search: Option<&str>) -> Result<Feed<Newsletter>> {
        let mut feed = self.list_ordered::<Newsletter>().await?;
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            feed.items.retain(|n| n.matches(term));
        }
        Ok(feed)
    }

    pub async fn newsletter(&self, id: &str) -> Result<Option<Newsletter>> {
        let feed = self.newsletters(None).await?;
        Ok(feed.items.into_iter().find(|n| n.id == id))
    }

    pub async fn events(&self) -> Result<Feed<Event>> {
        self.list_ordered::<Event>().await
    }

    /// Comments on one newsletter, newest first.
    pub async fn comments(&self, newsletter_id: &str) -> Result<Feed<Comment>> {
        let collection = Collection::Comments;
        let remote = self
            .remote
            .query_where(
                collection,
                COMMENT_PARENT_FIELD,
                newsletter_id,
                collection.order_field(),
            )
            .await;
        self.resolve(remote, |doc| {
            field_equals(doc, COMMENT_PARENT_FIELD, newsletter_id)
        })
    }

    async fn list_ordered<R: Record>(&self) -> Result<Feed<R>> {
        let collection = R::COLLECTION;
        let remote = self
            .remote
            .query_ordered_desc(collection, collection.order_field())
            .await;
        self.resolve(remote, |_| true)
    }

    fn resolve<R, F>(&self, remote: Result<Vec<Document>>, keep: F) -> Result<Feed<R>>
    where
        R: Record,
        F: Fn(&Document) -> bool,
    {
        let collection = R::COLLECTION;
        self.connectivity.observe(&remote);
        let (documents, source) = match remote {
            Ok(documents) => {
                debug!("Found {} {} in remote store", documents.len(), collection);
                (documents, FeedSource::Remote)
            }
            Err(e) if e.is_remote_unavailable() => {
                warn!(
                    "Failed to fetch {} from remote store, using local queue: {}",
                    collection, e
                );
                let mut local: Vec<Document> = self
                    .queue
                    .pending(collection)
                    .into_iter()
                    .filter(|doc| keep(doc))
                    .collect();
                sort_desc_by_field(&mut local, collection.order_field());
                (local, FeedSource::Local)
            }
            Err(e) => return Err(e),
        };

        let items = documents
            .into_iter()
            .filter_map(|doc| match R::from_document(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed {} document: {}", collection, e);
                    None
                }
            })
            .collect();
        Ok(Feed { items, source })
    }
}
