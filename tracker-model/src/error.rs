//! Model validation error types.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when an external payload does not describe an entry collection.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected an array of entries, found {0}")]
    NotAnArray(&'static str),

    #[error("invalid entry at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
