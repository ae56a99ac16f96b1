//! Storage-specific error types for file-backed stores.
//!
//! These are internal to the storage layer and converted to
//! `clubsite_core::Error` before being returned to callers.

use std::path::PathBuf;

use clubsite_core::errors::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid bucket key '{0}'")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StorageError::Malformed {
            path: path.into(),
            source,
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Malformed { .. } => Error::Serialization(err.to_string()),
            StorageError::InvalidKey(_) | StorageError::Io { .. } | StorageError::LockPoisoned => {
                Error::Storage(err.to_string())
            }
        }
    }
}
