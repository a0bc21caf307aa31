//! Assembles a ready-to-use store from configuration.

use crate::config::TrackerConfig;
use crate::error::SyncResult;
use crate::store::EntryStore;
use std::sync::Arc;
use tracing::info;
use tracker_cloud::HttpGateway;
use tracker_storage::{DuckDbMedium, SnapshotStore};

/// Installs the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`, and writes to stderr. A second
/// call, or a subscriber installed by the host, is left in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Opens the local snapshot, connects the remote when one is configured, and
/// builds the store on the current tokio runtime.
///
/// With `remote.auto_refresh` set, a refresh is launched in the background
/// before this returns.
pub fn bootstrap(config: TrackerConfig) -> SyncResult<EntryStore> {
    init_tracing();

    let medium = if config.is_in_memory() {
        DuckDbMedium::open_in_memory()?
    } else {
        info!("opening snapshot db: {}", config.snapshot_path.display());
        DuckDbMedium::open(&config.snapshot_path)?
    };
    let snapshot = SnapshotStore::with_key(Arc::new(medium), config.snapshot_key.clone());

    let mut builder = EntryStore::builder(snapshot);
    if config.remote.is_enabled() {
        let gateway = HttpGateway::new(&config.remote)?;
        info!("remote sync via {}", gateway.entries_url());
        builder = builder.gateway(Arc::new(gateway));
    } else {
        info!("no remote configured, running local only");
    }
    let store = builder.build()?;

    if config.remote.auto_refresh && store.has_remote() {
        store.spawn_refresh();
    }
    Ok(store)
}
