//! HTTP client for a hosted club-site document store.
//!
//! `HttpDocumentStore` implements `clubsite_core::remote::RemoteStore` against
//! the `/api/v1/documents` surface exposed by `clubsite-server`, so one server
//! can act as the remote store of another.

pub mod client;
pub mod error;
pub mod types;

pub use client::HttpDocumentStore;
pub use error::{RemoteClientError, Result};
