//! The reactive entry store.

use crate::error::{SyncError, SyncResult};
use crate::observers::{Observers, Subscription};
use crate::reconcile;
use crate::reducer;
use crate::status::SyncStatus;
use crate::tasks::BackgroundTasks;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracker_cloud::RemoteGateway;
use tracker_model::Entry;
use tracker_storage::{export_text, import_text, SnapshotStore};

type Collection = Arc<Vec<Entry>>;

struct Inner {
    snapshot: SnapshotStore,
    gateway: Option<Arc<dyn RemoteGateway>>,
    entries: watch::Sender<Collection>,
    status: watch::Sender<SyncStatus>,
    last_synced: watch::Sender<Option<DateTime<Utc>>>,
    entry_observers: Observers<Collection>,
    status_observers: Observers<SyncStatus>,
    tasks: BackgroundTasks,
}

impl Inner {
    /// Publishes a status change. Repeats of the current status are dropped,
    /// so observers see each transition once, in publish order.
    fn set_status(&self, status: SyncStatus) {
        let changed = self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            self.status_observers.enqueue(status);
            true
        });
        if changed {
            debug!("sync status -> {status}");
        }
        self.status_observers.flush();
    }

    fn mark_synced(&self) {
        self.last_synced.send_replace(Some(Utc::now()));
        self.set_status(SyncStatus::Idle);
    }

    /// Runs `reducer` over the current collection and, if it yields a new one,
    /// publishes it and saves the local snapshot before returning it.
    fn apply<F>(&self, reducer: F) -> Option<Collection>
    where
        F: FnOnce(&[Entry]) -> Option<Vec<Entry>>,
    {
        let mut committed = None;
        self.entries.send_if_modified(|current| {
            let Some(next) = reducer(current.as_slice()) else {
                return false;
            };
            let next = Arc::new(next);
            self.snapshot.save(&next);
            *current = Arc::clone(&next);
            self.entry_observers.enqueue(Arc::clone(&next));
            committed = Some(next);
            true
        });
        self.entry_observers.flush();
        committed
    }

    fn replace(&self, entries: Vec<Entry>) {
        let entries = reducer::dedupe_by_id(entries);
        self.apply(move |_| Some(entries));
    }
}

/// Writes `entries` to the remote, retrying once. The retry is not visible on
/// the status signal. Holds the store only weakly, so a hung write does not
/// keep a dropped store alive.
async fn write_with_retry(inner: Weak<Inner>, gateway: Arc<dyn RemoteGateway>, entries: Collection) {
    let mut ok = gateway.upsert_batch(&entries).await;
    if !ok {
        debug!("remote write failed, retrying once");
        ok = gateway.upsert_batch(&entries).await;
    }
    let Some(inner) = inner.upgrade() else {
        return;
    };
    if ok {
        inner.mark_synced();
    } else {
        warn!("remote write retry failed");
        inner.set_status(SyncStatus::Error);
    }
}

/// One pull from the remote. The store is upgraded only around the status
/// and state updates, never across the fetch.
async fn refresh(inner: &Weak<Inner>, gateway: &dyn RemoteGateway) -> bool {
    match inner.upgrade() {
        Some(inner) => inner.set_status(SyncStatus::Syncing),
        None => return false,
    }
    let result = reconcile::load_remote(gateway).await;
    let Some(inner) = inner.upgrade() else {
        return false;
    };
    match result {
        Ok(entries) => {
            if entries.is_empty() {
                debug!("remote has no entries, keeping local state");
            } else {
                info!("adopting {} entries from remote", entries.len());
                inner.replace(entries);
            }
            inner.mark_synced();
            true
        }
        Err(e) => {
            warn!("remote refresh failed: {e}");
            inner.set_status(SyncStatus::Error);
            false
        }
    }
}

/// Holds the entry collection and keeps it in sync with local and remote
/// persistence.
///
/// Cloning is cheap; clones share the same state. Background writes run on
/// the tokio runtime the store was built on.
#[derive(Clone)]
pub struct EntryStore {
    inner: Arc<Inner>,
}

/// Builder for [`EntryStore`].
pub struct EntryStoreBuilder {
    snapshot: SnapshotStore,
    gateway: Option<Arc<dyn RemoteGateway>>,
    seed: Vec<Entry>,
    runtime: Option<Handle>,
}

impl EntryStoreBuilder {
    /// Mirrors changes to this remote. Without one the store is local-only.
    pub fn gateway(mut self, gateway: Arc<dyn RemoteGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Collection to start from when the local snapshot is empty.
    pub fn seed(mut self, seed: Vec<Entry>) -> Self {
        self.seed = seed;
        self
    }

    /// Runtime for background sync tasks. Defaults to the current one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> SyncResult<EntryStore> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| SyncError::NoRuntime)?,
        };

        let loaded = self.snapshot.load();
        let initial = reducer::dedupe_by_id(if loaded.is_empty() { self.seed } else { loaded });
        info!(
            "entry store starting with {} entries ({})",
            initial.len(),
            if self.gateway.is_some() { "remote sync on" } else { "local only" }
        );
        self.snapshot.save(&initial);

        let inner = Inner {
            snapshot: self.snapshot,
            gateway: self.gateway,
            entries: watch::channel(Arc::new(initial)).0,
            status: watch::channel(SyncStatus::Idle).0,
            last_synced: watch::channel(None).0,
            entry_observers: Observers::new(),
            status_observers: Observers::new(),
            tasks: BackgroundTasks::new(runtime),
        };
        Ok(EntryStore {
            inner: Arc::new(inner),
        })
    }
}

impl EntryStore {
    pub fn builder(snapshot: SnapshotStore) -> EntryStoreBuilder {
        EntryStoreBuilder {
            snapshot,
            gateway: None,
            seed: Vec::new(),
            runtime: None,
        }
    }

    /// Builds a store mirrored to `gateway`, on the current tokio runtime.
    pub fn new(snapshot: SnapshotStore, gateway: Arc<dyn RemoteGateway>) -> SyncResult<Self> {
        Self::builder(snapshot).gateway(gateway).build()
    }

    /// Builds a store without remote sync, on the current tokio runtime.
    pub fn local_only(snapshot: SnapshotStore) -> SyncResult<Self> {
        Self::builder(snapshot).build()
    }

    // ── Reads ──

    pub fn entries(&self) -> Collection {
        self.inner.entries.borrow().clone()
    }

    pub fn get(&self, entry_id: &str) -> Option<Entry> {
        self.inner.entries.borrow().iter().find(|e| e.id == entry_id).cloned()
    }

    pub fn status(&self) -> SyncStatus {
        *self.inner.status.borrow()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_synced.borrow()
    }

    pub fn has_remote(&self) -> bool {
        self.inner.gateway.is_some()
    }

    // ── Subscriptions ──

    /// Registers `observer`, calls it with the current collection, then again
    /// after every change.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&[Entry]) + Send + Sync + 'static,
    {
        observer(self.entries().as_slice());
        self.inner
            .entry_observers
            .add(Arc::new(move |entries: &Collection| observer(entries.as_slice())))
    }

    /// Registers `observer` for the sync status: called with the current
    /// status, then on every transition.
    pub fn subscribe_status<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&SyncStatus) + Send + Sync + 'static,
    {
        let observer: Arc<dyn Fn(&SyncStatus) + Send + Sync> = Arc::new(observer);
        observer(&self.status());
        self.inner.status_observers.add(observer)
    }

    /// Removes an entry or status observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.inner.entry_observers.remove(subscription)
            || self.inner.status_observers.remove(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.entry_observers.len() + self.inner.status_observers.len()
    }

    /// Receiver that always holds the latest collection.
    pub fn watch_entries(&self) -> watch::Receiver<Collection> {
        self.inner.entries.subscribe()
    }

    pub fn watch_status(&self) -> watch::Receiver<SyncStatus> {
        self.inner.status.subscribe()
    }

    pub fn watch_last_synced(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.inner.last_synced.subscribe()
    }

    // ── Mutations ──

    /// Swaps in a whole collection learned from an authoritative source.
    ///
    /// Saves the local snapshot but launches no remote write. Later duplicates
    /// of an id are dropped.
    pub fn replace(&self, entries: Vec<Entry>) {
        self.inner.replace(entries);
    }

    /// Flips a milestone's `done` flag and recomputes the entry's progress.
    /// Unknown entries or milestones are ignored.
    pub fn toggle_milestone(&self, entry_id: &str, milestone_id: &str) {
        match self.inner.apply(|entries| reducer::toggle_milestone(entries, entry_id, milestone_id)) {
            Some(committed) => self.spawn_write(committed),
            None => debug!("toggle ignored: no milestone {milestone_id} on entry {entry_id}"),
        }
    }

    /// Prepends an entry. An entry with the same id is replaced and moved to
    /// the front.
    pub fn add_entry(&self, entry: Entry) {
        if self.inner.entries.borrow().iter().any(|e| e.id == entry.id) {
            warn!("add_entry: replacing existing entry {}", entry.id);
        }
        if let Some(committed) = self.inner.apply(move |entries| Some(reducer::add_entry(entries, entry))) {
            self.spawn_write(committed);
        }
    }

    /// Sets an entry's progress, clamped into `[0, 1]`. Unknown entries are ignored.
    pub fn set_progress(&self, entry_id: &str, progress: f64) {
        match self.inner.apply(|entries| reducer::set_progress(entries, entry_id, progress)) {
            Some(committed) => self.spawn_write(committed),
            None => debug!("set_progress ignored: no entry {entry_id}"),
        }
    }

    /// Sets the status from outside, e.g. from connectivity detection.
    pub fn set_status(&self, status: SyncStatus) {
        self.inner.set_status(status);
    }

    pub fn mark_offline(&self) {
        self.inner.set_status(SyncStatus::Offline);
    }

    // ── Remote refresh ──

    /// Pulls the remote collection and adopts it if it is non-empty.
    ///
    /// An empty remote is "nothing new", never "clear everything". Returns
    /// false if the remote could not be read. Without a remote this returns
    /// false and leaves the status alone.
    pub async fn refresh_with_status(&self) -> bool {
        let Some(gateway) = self.inner.gateway.clone() else {
            debug!("refresh skipped: no remote configured");
            return false;
        };
        refresh(&Arc::downgrade(&self.inner), gateway.as_ref()).await
    }

    /// Launches [`refresh_with_status`](Self::refresh_with_status) in the background.
    pub fn spawn_refresh(&self) {
        let Some(gateway) = self.inner.gateway.clone() else {
            debug!("refresh skipped: no remote configured");
            return;
        };
        let inner = Arc::downgrade(&self.inner);
        self.inner.tasks.spawn(async move {
            refresh(&inner, gateway.as_ref()).await;
        });
    }

    // ── Import / export ──

    /// Pretty-printed JSON of the current collection.
    pub fn export_text(&self) -> String {
        export_text(&self.entries())
    }

    /// Replaces the collection with an exported one. Malformed input leaves
    /// the store untouched.
    pub fn import_text(&self, text: &str) -> SyncResult<usize> {
        let entries = import_text(text)?;
        let count = entries.len();
        self.replace(entries);
        info!("imported {count} entries");
        Ok(count)
    }

    // ── Background work ──

    /// Waits for every background sync task launched so far.
    pub async fn settle(&self) {
        self.inner.tasks.settle().await;
    }

    /// Number of background sync tasks still running.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.in_flight()
    }

    /// Starts the background upsert of `snapshot`. The status moves to
    /// `writing` before this returns.
    fn spawn_write(&self, snapshot: Collection) {
        let Some(gateway) = self.inner.gateway.clone() else {
            return;
        };
        self.inner.set_status(SyncStatus::Writing);
        let inner = Arc::downgrade(&self.inner);
        self.inner.tasks.spawn(write_with_retry(inner, gateway, snapshot));
    }
}
