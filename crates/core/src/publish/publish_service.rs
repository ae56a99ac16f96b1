//! Write path: validate, write to the remote store, fall back to the local
//! queue when the store is unreachable.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};

use super::publish_model::{DeleteOutcome, PublishOutcome, Published};
use crate::errors::{Error, Result};
use crate::queue::LocalQueue;
use crate::records::{
    Collection, Comment, Event, IdGenerator, NewComment, NewEvent, NewNewsletter, Newsletter,
    Record,
};
use crate::remote::RemoteStore;
use crate::sync::SyncCoordinator;

pub struct PublishService {
    remote: Arc<dyn RemoteStore>,
    queue: LocalQueue,
    sync: Arc<SyncCoordinator>,
    ids: IdGenerator,
}

impl PublishService {
    pub fn new(remote: Arc<dyn RemoteStore>, queue: LocalQueue, sync: Arc<SyncCoordinator>) -> Self {
        Self {
            remote,
            queue,
            sync,
            ids: IdGenerator::new(),
        }
    }

    pub async fn publish_newsletter(&self, input: NewNewsletter) -> Result<Published<Newsletter>> {
        input.validate()?;
        let record = input.into_record(self.ids.next_id(), Utc::now());
        self.store(record).await
    }

    pub async fn publish_event(&self, input: NewEvent) -> Result<Published<Event>> {
        input.validate()?;
        let record = input.into_record(self.ids.next_id(), Utc::now());
        self.store(record).await
    }

    pub async fn post_comment(&self, input: NewComment) -> Result<Published<Comment>> {
        input.validate()?;
        let record = input.into_record(self.ids.next_id(), Utc::now());
        self.store(record).await
    }

    /// Writes an already built record. Used by the publish operations and
    /// available to callers that assign ids themselves.
    pub async fn store<R: Record>(&self, record: R) -> Result<Published<R>> {
        let collection = R::COLLECTION;
        let document = record.to_document()?;
        self.sync.clear_deleted(collection, record.id());
        let result = self.remote.upsert(collection, record.id(), document.clone()).await;
        self.sync.connectivity().observe(&result);

        match result {
            Ok(()) => {
                info!("Saved {} {} to remote store", collection, record.id());
                // Opportunistically flush anything queued while offline.
                if self.has_pending() {
                    self.sync.request_sync();
                }
                Ok(Published {
                    record,
                    outcome: PublishOutcome::Stored,
                })
            }
            Err(e) if e.is_remote_unavailable() => {
                warn!(
                    "Failed to save {} {} to remote store, queued locally: {}",
                    collection,
                    record.id(),
                    e
                );
                self.queue.enqueue(collection, document);
                Ok(Published {
                    record,
                    outcome: PublishOutcome::Queued,
                })
            }
            Err(e) => {
                error!("Failed to save {} {}: {}", collection, record.id(), e);
                Err(e)
            }
        }
    }

    /// Deletes from the remote store and from the local queue.
    ///
    /// Succeeds when either copy was removed. Fails with `NotFound` when the
    /// remote store has no such record and nothing was queued under the id,
    /// and with `RemoteUnavailable` when the store is unreachable and nothing
    /// was queued (the remote copy, if any, is untouched).
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<DeleteOutcome> {
        self.sync.mark_deleted(collection, id);
        let remote = self.remote.delete(collection, id).await;
        self.sync.connectivity().observe(&remote);
        let local = self.queue.remove(collection, id);

        match remote {
            Ok(()) => {
                info!("Deleted {} {} from remote store", collection, id);
                Ok(DeleteOutcome {
                    remote: true,
                    local,
                })
            }
            Err(e) if local => {
                warn!(
                    "Remote delete of {} {} failed ({}), removed queued copy",
                    collection, id, e
                );
                Ok(DeleteOutcome {
                    remote: false,
                    local,
                })
            }
            Err(Error::NotFound(_)) => Err(Error::not_found(format!(
                "{} {} not found",
                collection, id
            ))),
            Err(e) => {
                error!("Failed to delete {} {}: {}", collection, id, e);
                Err(e)
            }
        }
    }

    fn has_pending(&self) -> bool {
        self.queue.pending_counts().values().any(|count| *count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::records::document_id;
    use crate::sync::Connectivity;
    use crate::test_support::{doc, FakeRemote, MemoryBuckets};

    fn setup() -> (PublishService, Arc<FakeRemote>, LocalQueue, Arc<SyncCoordinator>) {
        let remote = Arc::new(FakeRemote::default());
        let queue = LocalQueue::new(Arc::new(MemoryBuckets::default()));
        let sync = Arc::new(SyncCoordinator::new(
            remote.clone(),
            queue.clone(),
            Connectivity::default(),
        ));
        let service = PublishService::new(remote.clone(), queue.clone(), sync.clone());
        (service, remote, queue, sync)
    }

    fn newsletter() -> NewNewsletter {
        NewNewsletter {
            title: Some("T".into()),
            date: Some("2024-01-01".into()),
            content: Some("C".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn publish_goes_to_remote_when_reachable() {
        let (service, remote, queue, _) = setup();
        let published = service.publish_newsletter(newsletter()).await.unwrap();

        assert_eq!(published.outcome, PublishOutcome::Stored);
        assert!(published.notice().is_none());
        assert!(remote.contains(Collection::Newsletters, &published.record.id));
        assert!(queue.pending(Collection::Newsletters).is_empty());
    }

    #[tokio::test]
    async fn publish_queues_locally_when_offline() {
        let (service, remote, queue, sync) = setup();
        remote.set_offline(true);

        let published = service.publish_newsletter(newsletter()).await.unwrap();

        assert!(published.is_queued());
        assert_eq!(
            published.notice(),
            Some("Saved locally. Will sync when connection restored.")
        );
        let pending = queue.pending(Collection::Newsletters);
        assert_eq!(pending.len(), 1);
        assert_eq!(document_id(&pending[0]), Some(published.record.id.as_str()));
        assert!(!sync.connectivity().is_online());
    }

    #[tokio::test]
    async fn validation_failure_touches_no_store() {
        let (service, remote, queue, _) = setup();
        let input = NewNewsletter {
            title: Some("T".into()),
            ..Default::default()
        };
        let err = service.publish_newsletter(input).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(ref f)) if f == "date"
        ));
        assert!(remote.upsert_log().is_empty());
        assert!(queue.pending(Collection::Newsletters).is_empty());
    }

    #[tokio::test]
    async fn successful_write_does_not_clear_other_pending_records() {
        let (service, _remote, queue, sync) = setup();
        queue.enqueue(Collection::Newsletters, doc("queued", "2024-01-01"));

        service.publish_newsletter(newsletter()).await.unwrap();

        // Still pending until a sync pass pushes it; the pass was requested.
        assert_eq!(queue.pending(Collection::Newsletters).len(), 1);
        sync.sync_requested().await;
        sync.run_pass().await;
        assert!(queue.pending(Collection::Newsletters).is_empty());
    }

    #[tokio::test]
    async fn offline_then_sync_scenario() {
        let (service, remote, queue, sync) = setup();
        remote.set_offline(true);
        let record = Newsletter {
            id: "1700000000000".into(),
            title: "T".into(),
            author: "Anonymous".into(),
            date: "2024-01-01".into(),
            content: "C".into(),
            image_url: String::new(),
            video_url: String::new(),
            timestamp: String::new(),
        };
        service.store(record.clone()).await.unwrap();

        remote.set_offline(false);
        sync.connectivity().mark_online();
        let report = sync.run_pass().await;

        assert_eq!(report.synced_total(), 1);
        assert!(remote.contains(Collection::Newsletters, "1700000000000"));
        assert!(queue.pending(Collection::Newsletters).is_empty());
    }

    #[tokio::test]
    async fn event_and_comment_publishing() {
        let (service, remote, _, _) = setup();
        let event = service
            .publish_event(NewEvent {
                name: Some("Quiz".into()),
                date: Some("2024-02-02".into()),
                start_time: Some("16:00".into()),
                end_time: Some("17:00".into()),
                hosts: vec!["Ana".into()],
                description: Some("Trivia".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let comment = service
            .post_comment(NewComment {
                newsletter_id: Some("n1".into()),
                author: Some("Ben".into()),
                content: Some("Great".into()),
            })
            .await
            .unwrap();

        assert!(remote.contains(Collection::Events, &event.record.id));
        assert!(remote.contains(Collection::Comments, &comment.record.id));
        assert_ne!(event.record.id, comment.record.id);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found_and_local_noop() {
        let (service, _remote, queue, _) = setup();
        queue.enqueue(Collection::Events, doc("other", "2024-01-01"));

        let err = service.delete(Collection::Events, "missing").await.unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(queue.pending(Collection::Events).len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_remote_copy() {
        let (service, remote, _, _) = setup();
        let published = service.publish_newsletter(newsletter()).await.unwrap();

        let outcome = service
            .delete(Collection::Newsletters, &published.record.id)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome { remote: true, local: false });
        assert!(!remote.contains(Collection::Newsletters, &published.record.id));
    }

    #[tokio::test]
    async fn delete_while_offline_removes_queued_copy() {
        let (service, remote, queue, _) = setup();
        remote.set_offline(true);
        let published = service.publish_newsletter(newsletter()).await.unwrap();

        let outcome = service
            .delete(Collection::Newsletters, &published.record.id)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome { remote: false, local: true });
        assert!(queue.pending(Collection::Newsletters).is_empty());
    }

    #[tokio::test]
    async fn delete_while_offline_without_local_copy_is_unavailable() {
        let (service, remote, _, _) = setup();
        remote.set_offline(true);
        let err = service.delete(Collection::Comments, "c1").await.unwrap_err();
        assert!(err.is_remote_unavailable());
    }

    #[tokio::test]
    async fn storing_a_deleted_id_again_syncs_it() {
        let (service, remote, queue, sync) = setup();
        queue.enqueue(Collection::Comments, doc("c1", "2024-01-01"));
        service.delete(Collection::Comments, "c1").await.unwrap();

        remote.set_offline(true);
        let record = Comment {
            id: "c1".into(),
            newsletter_id: "n1".into(),
            author: "Anonymous".into(),
            content: "back again".into(),
            date: "2024-01-02T00:00:00.000Z".into(),
        };
        assert!(service.store(record).await.unwrap().is_queued());

        remote.set_offline(false);
        sync.connectivity().mark_online();
        let report = sync.run_pass().await;
        assert_eq!(report.synced_total(), 1);
        assert!(remote.contains(Collection::Comments, "c1"));
    }
}
