//! Reactive entry store with optimistic dual-write sync.
//!
//! [`EntryStore`] owns the in-memory entry collection. Every mutation:
//! 1. runs a pure reducer from [`reducer`] over the current collection
//! 2. publishes the new collection and saves the local snapshot, before the
//!    call returns
//! 3. launches a background upsert of the full post-mutation collection,
//!    retried once, whose outcome drives the [`SyncStatus`] signal
//!
//! Local state is never rolled back when the remote write fails.
//!
//! [`reconcile`] turns remote rows, whose milestones may be malformed, into
//! entries before a refresh adopts them.

mod bootstrap;
pub mod config;
mod error;
mod observers;
pub mod reconcile;
pub mod reducer;
mod status;
mod store;
mod tasks;

pub use bootstrap::{bootstrap, init_tracing};
pub use config::TrackerConfig;
pub use error::{SyncError, SyncResult};
pub use observers::Subscription;
pub use status::SyncStatus;
pub use store::{EntryStore, EntryStoreBuilder};
