//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// The store refused the write (size limit reached).
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),
}
