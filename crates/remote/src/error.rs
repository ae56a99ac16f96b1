//! Error types for the remote client.

use clubsite_core::errors::Error;
use thiserror::Error;

/// Result type alias for remote client operations.
pub type Result<T> = std::result::Result<T, RemoteClientError>;

/// Errors that can occur while talking to a hosted document store.
#[derive(Debug, Error)]
pub enum RemoteClientError {
    /// Transport failure: connection refused, DNS, timeout
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the store
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The client could not be configured
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RemoteClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether the caller should keep the write and retry later. True for
    /// transport failures and for 401, 403, 408, 429 and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => {
                matches!(*status, 401 | 403 | 408 | 429) || (500..600).contains(status)
            }
            Self::Json(_) | Self::Config(_) => false,
        }
    }
}

impl From<RemoteClientError> for Error {
    fn from(err: RemoteClientError) -> Self {
        if err.is_retryable() {
            return Error::RemoteUnavailable(err.to_string());
        }
        match err {
            RemoteClientError::Api { status: 404, message } => Error::NotFound(message),
            RemoteClientError::Api { status: 400, message } => {
                Error::Validation(clubsite_core::errors::ValidationError::InvalidInput(message))
            }
            RemoteClientError::Json(e) => Error::Serialization(e.to_string()),
            other => Error::Unexpected(other.to_string()),
        }
    }
}
