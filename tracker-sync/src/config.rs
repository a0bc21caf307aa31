//! Top-level tracker configuration.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracker_cloud::RemoteConfig;
use tracker_storage::DEFAULT_SNAPSHOT_KEY;

pub const ENV_SNAPSHOT_PATH: &str = "TRACKER_SNAPSHOT_PATH";
pub const ENV_SNAPSHOT_KEY: &str = "TRACKER_SNAPSHOT_KEY";

/// Path value that keeps the snapshot database in memory.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Everything [`bootstrap`](crate::bootstrap) needs to assemble a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// DuckDB file holding the local snapshot, or `:memory:`.
    pub snapshot_path: PathBuf,

    /// Key the collection is stored under.
    pub snapshot_key: String,

    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("tracker.duckdb"),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            remote: RemoteConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// In-memory snapshot, no remote.
    pub fn in_memory() -> Self {
        Self {
            snapshot_path: PathBuf::from(IN_MEMORY_PATH),
            ..Self::default()
        }
    }

    /// Reads `TRACKER_SNAPSHOT_*` plus the remote settings from the
    /// environment. Unset variables keep their defaults.
    pub fn from_env() -> SyncResult<Self> {
        let remote = RemoteConfig::from_env().map_err(|e| SyncError::Config(e.to_string()))?;
        let mut config = Self {
            remote,
            ..Self::default()
        };
        if let Some(path) = env_var(ENV_SNAPSHOT_PATH) {
            config.snapshot_path = PathBuf::from(path);
        }
        if let Some(key) = env_var(ENV_SNAPSHOT_KEY) {
            config.snapshot_key = key;
        }
        Ok(config)
    }

    pub fn is_in_memory(&self) -> bool {
        self.snapshot_path.as_os_str() == IN_MEMORY_PATH
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
