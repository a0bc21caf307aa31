//! Whole-collection snapshots plus portable import/export.

use crate::error::SnapshotResult;
use crate::medium::SnapshotMedium;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use tracker_model::{parse_entries, Entry};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "tracker-data-v1";

/// Best-effort local persistence of the entry collection.
#[derive(Clone)]
pub struct SnapshotStore {
    medium: Arc<dyn SnapshotMedium>,
    key: String,
}

impl SnapshotStore {
    pub fn new(medium: Arc<dyn SnapshotMedium>) -> Self {
        Self::with_key(medium, DEFAULT_SNAPSHOT_KEY)
    }

    pub fn with_key(medium: Arc<dyn SnapshotMedium>, key: impl Into<String>) -> Self {
        Self {
            medium,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the saved collection, or an empty one if nothing usable is stored.
    pub fn load(&self) -> Vec<Entry> {
        if !self.medium.is_available() {
            return Vec::new();
        }
        let raw = match self.medium.get(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!("failed to read snapshot {}: {e}", self.key);
                return Vec::new();
            }
        };
        match parse_entries(&raw) {
            Ok(entries) => {
                debug!("loaded {} entries from snapshot {}", entries.len(), self.key);
                entries
            }
            Err(e) => {
                warn!("ignoring unusable snapshot {}: {e}", self.key);
                Vec::new()
            }
        }
    }

    /// Saves the collection. Failures are logged and swallowed.
    pub fn save(&self, entries: &[Entry]) {
        if !self.medium.is_available() {
            return;
        }
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to encode snapshot {}: {e}", self.key);
                return;
            }
        };
        if let Err(e) = self.medium.set(&self.key, &json) {
            warn!("failed to save snapshot {}: {e}", self.key);
        }
    }
}

/// Pretty-printed JSON array of the collection.
pub fn export_text(entries: &[Entry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|e| {
        warn!("failed to export entries: {e}");
        "[]".to_string()
    })
}

/// Parses an exported collection. Never returns a partial result.
pub fn import_text(text: &str) -> SnapshotResult<Vec<Entry>> {
    Ok(parse_entries(text)?)
}

/// Reads `path` and imports its contents.
pub fn import_file(path: &Path) -> SnapshotResult<Vec<Entry>> {
    let text = std::fs::read_to_string(path)?;
    import_text(&text)
}
