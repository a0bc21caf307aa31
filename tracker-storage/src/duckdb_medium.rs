//! DuckDB-backed key-value medium.

use crate::error::StorageResult;
use crate::medium::SnapshotMedium;
use chrono::Utc;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Limits for every snapshot connection, file-backed or in-memory.
const MEMORY_LIMIT: &str = "64MB";
const THREADS: u32 = 1;

/// Stores snapshot blobs in a `kv_snapshots` table.
#[derive(Clone)]
pub struct DuckDbMedium {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbMedium {
    /// Opens or creates the medium at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = open_with_wal_recovery(path)?;
        apply_resource_limits(&conn)?;
        initialize_kv_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory medium (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_resource_limits(&conn)?;
        initialize_kv_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Millisecond timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> StorageResult<Option<i64>> {
        let conn = self.lock();
        match conn.query_row(
            "SELECT updated_at FROM kv_snapshots WHERE key = ?",
            params![key],
            |row| row.get(0),
        ) {
            Ok(ts) => Ok(Some(ts)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotMedium for DuckDbMedium {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.lock();
        match conn.query_row(
            "SELECT value FROM kv_snapshots WHERE key = ?",
            params![key],
            |row| row.get(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT OR REPLACE INTO kv_snapshots (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}

/// Opens `path`, deleting a leftover `<file>.wal` and retrying once if the
/// first open fails. An unclean shutdown can leave a WAL that blocks reopening.
fn open_with_wal_recovery(path: &Path) -> StorageResult<Connection> {
    let first_err = match Connection::open(path) {
        Ok(conn) => return Ok(conn),
        Err(e) => e,
    };
    let mut wal = path.as_os_str().to_owned();
    wal.push(".wal");
    let wal = Path::new(&wal);
    if !wal.exists() || std::fs::remove_file(wal).is_err() {
        return Err(first_err.into());
    }
    warn!("snapshot db open failed ({first_err}), removed stale WAL {}", wal.display());
    Ok(Connection::open(path)?)
}

fn apply_resource_limits(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA memory_limit='{MEMORY_LIMIT}'; PRAGMA threads={THREADS};"
    ))?;
    Ok(())
}

fn initialize_kv_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv_snapshots (
            key VARCHAR PRIMARY KEY,
            value VARCHAR NOT NULL,
            updated_at BIGINT NOT NULL
        );",
    )?;
    Ok(())
}
