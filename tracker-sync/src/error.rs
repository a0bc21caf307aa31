//! Sync error types.

use thiserror::Error;
use tracker_cloud::CloudError;
use tracker_storage::{SnapshotError, StorageError};

/// Result type for store construction and imports.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the entry store.
///
/// Background sync failures never show up here; they only move the
/// [`SyncStatus`](crate::SyncStatus) to `error`.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no tokio runtime available for background sync")]
    NoRuntime,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("cloud error: {0}")]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Import(#[from] SnapshotError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
