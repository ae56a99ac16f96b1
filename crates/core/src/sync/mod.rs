//! Sync module - connectivity tracking and the local-to-remote coordinator.

mod connectivity;
mod sync_model;
mod sync_service;

pub use connectivity::Connectivity;
pub use sync_model::{CollectionSyncResult, SyncReport};
pub use sync_service::SyncCoordinator;
