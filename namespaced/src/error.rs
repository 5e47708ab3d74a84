//! Error types for namespaced store operations.

use common::StorageError;

/// Error type for namespaced store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The namespace given at construction is not a valid identifier.
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// No record exists for the requested key.
    #[error("not found")]
    NotFound,

    /// The value passed to `put` could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored value is not valid JSON, or does not match the requested type.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Storage-related errors from the underlying flat store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal errors indicating bugs or invariant violations.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns `true` if this error signals a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Storage(msg) => Error::Storage(msg),
            StorageError::Internal(msg) => Error::Internal(msg),
        }
    }
}

/// Result type alias for namespaced store operations.
pub type Result<T> = std::result::Result<T, Error>;
