//! Key-value media that can hold a snapshot.

use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Synchronous string key-value storage.
///
/// A medium may be absent altogether (no browser storage, read-only install);
/// callers check [`is_available`](SnapshotMedium::is_available) and skip it.
pub trait SnapshotMedium: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-process medium.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a medium that already holds `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let medium = Self::new();
        medium
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), value.into());
        medium
    }
}

impl SnapshotMedium for MemoryMedium {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A medium that does not exist in this context.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableMedium;

impl SnapshotMedium for UnavailableMedium {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }
}
