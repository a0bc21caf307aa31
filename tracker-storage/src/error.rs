//! Storage error types.

use thiserror::Error;
use tracker_model::ModelError;

/// Result type for medium operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for user-initiated snapshot imports.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Failures of the underlying key-value medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("snapshot medium unavailable")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of an import, surfaced directly to the user.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] ModelError),

    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
}
