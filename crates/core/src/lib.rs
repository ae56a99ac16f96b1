//! Club Site Core - records, local queue, remote store capability and the
//! sync logic between them.
//!
//! This crate is storage-agnostic: it defines the `BucketStore` and
//! `RemoteStore` traits that the `storage-fs` and `remote` crates implement.

pub mod constants;
pub mod errors;
pub mod feed;
pub mod publish;
pub mod queue;
pub mod records;
pub mod remote;
pub mod sync;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
