//! Local snapshot storage for the tracker.
//!
//! The whole entry collection is kept as one JSON blob under a single key of
//! a key-value [`SnapshotMedium`]. On desktop the medium is a small DuckDB
//! table ([`DuckDbMedium`]); tests and headless sessions use
//! [`MemoryMedium`].
//!
//! [`SnapshotStore`] is best-effort: loading never fails and saving never
//! propagates an error. Only user-initiated imports ([`import_text`]) report
//! failures, since the user has to see that an import was rejected.

mod duckdb_medium;
mod error;
mod medium;
mod snapshot;

pub use duckdb_medium::DuckDbMedium;
pub use error::{SnapshotError, SnapshotResult, StorageError, StorageResult};
pub use medium::{MemoryMedium, SnapshotMedium, UnavailableMedium};
pub use snapshot::{export_text, import_file, import_text, SnapshotStore, DEFAULT_SNAPSHOT_KEY};
