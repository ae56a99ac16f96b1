use std::sync::Arc;

use anyhow::Context;
use clubsite_core::{
    feed::FeedService,
    publish::{DeleteGate, PublishService},
    queue::LocalQueue,
    remote::RemoteStore,
    sync::{Connectivity, SyncCoordinator},
};
use clubsite_remote::HttpDocumentStore;
use clubsite_storage_fs::{FileBucketStore, FileDocumentStore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Everything the handlers and the scheduler need, built once at startup.
pub struct AppState {
    /// Backing document store, also served directly by the document API.
    pub remote: Arc<dyn RemoteStore>,
    pub queue: LocalQueue,
    pub sync: Arc<SyncCoordinator>,
    pub feed: FeedService,
    pub publish: PublishService,
    pub delete_gate: DeleteGate,
}

impl AppState {
    pub fn new(remote: Arc<dyn RemoteStore>, queue: LocalQueue, delete_gate: DeleteGate) -> Self {
        let connectivity = Connectivity::default();
        let sync = Arc::new(SyncCoordinator::new(
            remote.clone(),
            queue.clone(),
            connectivity.clone(),
        ));
        let feed = FeedService::new(remote.clone(), queue.clone(), connectivity);
        let publish = PublishService::new(remote.clone(), queue.clone(), sync.clone());
        Self {
            remote,
            queue,
            sync,
            feed,
            publish,
            delete_gate,
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("CLUB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let queue_dir = config.data_dir.join("local");
    let bucket_store = FileBucketStore::new(&queue_dir)
        .with_context(|| format!("Failed to open local queue at {}", queue_dir.display()))?;
    let queue = LocalQueue::new(Arc::new(bucket_store));

    let remote: Arc<dyn RemoteStore> = match &config.remote_url {
        Some(url) => {
            tracing::info!("Using remote document store at {}", url);
            Arc::new(HttpDocumentStore::with_timeout(url, config.request_timeout)?)
        }
        None => {
            let store_dir = config.data_dir.join("store");
            let store = FileDocumentStore::open(&store_dir).with_context(|| {
                format!("Failed to open document store at {}", store_dir.display())
            })?;
            tracing::info!("Using file document store at {}", store.dir().display());
            Arc::new(store)
        }
    };

    let delete_gate = match &config.delete_phrase {
        Some(phrase) => DeleteGate::with_phrase(phrase.clone()),
        None => DeleteGate::open(),
    };
    if delete_gate.is_required() {
        tracing::info!("Deletes require the confirmation phrase");
    }

    Ok(Arc::new(AppState::new(remote, queue, delete_gate)))
}
