//! Storage-specific error types for JSON file operations.
//!
//! This module provides error types that wrap IO and serde_json errors and
//! convert them to the storage-agnostic error types defined in
//! `caixinha_core`.

use std::path::PathBuf;

use caixinha_core::errors::{Error, PersistenceError};
use thiserror::Error;

/// Storage-specific errors.
///
/// These errors are internal to the storage layer and are converted to
/// `caixinha_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid record '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },

    #[error("In-memory tables are unavailable: lock poisoned")]
    LockPoisoned,

    #[error("Writer actor stopped")]
    WriterStopped,

    #[error("A write job panicked and was rolled back")]
    JobPanicked,
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::ReadFailed { .. } | StorageError::LockPoisoned => {
                Error::Persistence(PersistenceError::ReadFailed(message))
            }
            StorageError::WriteFailed { .. } => {
                Error::Persistence(PersistenceError::WriteFailed(message))
            }
            StorageError::InvalidJson { .. } | StorageError::InvalidRecord { .. } => {
                Error::Persistence(PersistenceError::Corrupt(message))
            }
            StorageError::WriterStopped => {
                Error::Persistence(PersistenceError::WriterStopped(message))
            }
            StorageError::JobPanicked => Error::Unexpected(message),
        }
    }
}

/// Extension trait for converting storage results to core results.
pub trait IntoCore<T> {
    fn into_core(self) -> caixinha_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> caixinha_core::Result<T> {
        self.map_err(Error::from)
    }
}
