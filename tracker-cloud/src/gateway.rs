//! The remote persistence seam.

use crate::error::CloudResult;
use crate::rows::RemoteRow;
use async_trait::async_trait;
use tracing::warn;
use tracker_model::Entry;

/// Fetch-all and upsert-batch against the remote collection.
///
/// Implementors provide the fallible `try_*` methods. The infallible
/// [`fetch_all`](RemoteGateway::fetch_all) and
/// [`upsert_batch`](RemoteGateway::upsert_batch) log the failure and fold it
/// into an empty result or `false`.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Reads every remote row.
    async fn try_fetch_all(&self) -> CloudResult<Vec<RemoteRow>>;

    /// Upserts the given collection, keyed by entry id.
    async fn try_upsert_batch(&self, entries: &[Entry]) -> CloudResult<()>;

    /// Reads every remote row; empty on any failure.
    async fn fetch_all(&self) -> Vec<RemoteRow> {
        match self.try_fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(transient = e.is_transient(), "remote fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// Upserts the given collection; `true` only if the remote accepted it.
    async fn upsert_batch(&self, entries: &[Entry]) -> bool {
        match self.try_upsert_batch(entries).await {
            Ok(()) => true,
            Err(e) => {
                warn!(transient = e.is_transient(), "remote write failed: {e}");
                false
            }
        }
    }
}
