//! Core error types for the club site.
//!
//! Storage and transport crates convert their own failures into these types so
//! that the queue, sync and read paths can decide between "retry later",
//! "tell the caller" and "fail the request".

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The remote document store could not be reached (offline, timeout,
    /// permission). Always recoverable: callers fall back to the local queue.
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// The delete confirmation phrase did not match. This is UI friction, not
    /// access control.
    #[error("Confirmation rejected: {0}")]
    ConfirmationRejected(String),

    /// Local storage I/O failed (file-backed document store, bucket files).
    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Error::RemoteUnavailable(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    /// True when the failure means "retry later".
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Error::RemoteUnavailable(_))
    }
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
