//! File-backed storage for the club site.
//!
//! This crate implements the storage traits defined in `clubsite-core`:
//! - `BucketStore` for the local queue (`buckets`), one JSON file per bucket
//! - `RemoteStore` for a self-hosted document store (`documents`), one JSON
//!   file per collection
//!
//! In-memory variants of both are provided for tests and throwaway setups.
//!
//! ```text
//!   core (queue, sync, feed, publish)
//!                 │
//!                 ▼
//!      storage-fs (this crate)
//!                 │
//!                 ▼
//!        <data dir>/*.json
//! ```

pub mod buckets;
pub mod documents;
pub mod errors;

pub use buckets::{FileBucketStore, MemoryBucketStore};
pub use documents::{FileDocumentStore, MemoryDocumentStore};
