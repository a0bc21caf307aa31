//! Remote gateway error types.

use thiserror::Error;
use tracker_model::ModelError;

/// Result type for remote operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors that can occur talking to the remote.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("write rejected: shared secret missing or incorrect")]
    Unauthorized,

    #[error("invalid remote payload: {0}")]
    InvalidPayload(#[from] ModelError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CloudError {
    /// True for failures a later attempt may not hit (network, 5xx, 429).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Api(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
