//! Sync status signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current state of synchronization with the remote.
///
/// Transitions: `idle -> syncing -> {idle, error}` for a refresh,
/// `idle -> writing -> {idle, error}` for a mutation's background write.
/// `error` only clears on a later successful operation. `offline` is never
/// produced internally; a connectivity collaborator sets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Writing,
    Error,
    Offline,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Writing => "writing",
            Self::Error => "error",
            Self::Offline => "offline",
        }
    }

    /// True while a remote read or write is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Syncing | Self::Writing)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
