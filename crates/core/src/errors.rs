//! Core error types for the Caixinha bank.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (file IO, JSON encoding) are converted to these types by the storage layer.

use thiserror::Error;

use crate::accounts::AccountError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the bank.
///
/// Every failure that can reach a request handler is one of these variants,
/// so the HTTP layer can map them to status codes and user-facing messages.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Account(#[from] AccountError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid account number or password")]
    InvalidCredentials,

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for persistence operations.
///
/// Uses `String` for the details so the storage crate can convert its own
/// error types (IO, serde_json, channel failures) into this format.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// A backing file could not be read.
    #[error("Failed to read {0}")]
    ReadFailed(String),

    /// A backing file could not be written or replaced.
    #[error("Failed to write {0}")]
    WriteFailed(String),

    /// A backing file exists but does not hold a valid table.
    #[error("Corrupt data file: {0}")]
    Corrupt(String),

    /// The writer actor is gone; no further mutations are possible.
    #[error("Writer stopped: {0}")]
    WriterStopped(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Unknown goal category: {0}")]
    UnknownGoalCategory(String),
}

impl Error {
    /// Shorthand for `Error::Validation(ValidationError::InvalidInput(..))`.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(PersistenceError::Corrupt(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
