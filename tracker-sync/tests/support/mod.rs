#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracker_cloud::{CloudError, CloudResult, RemoteGateway, RemoteRow};
use tracker_model::{Entry, EntryKind, Milestone};
use tracker_storage::{MemoryMedium, SnapshotMedium, SnapshotStore};
use tracker_sync::{EntryStore, SyncStatus};

// ── Scripted gateway ────────────────────────────────────────────

/// A remote whose answers are queued up by the test.
///
/// Upserts pop outcomes from `upsert_outcomes` (an empty queue means success)
/// and record every payload they were given. Fetches return `fetch_result`.
/// With a gate installed, each upsert waits for one permit first.
pub struct ScriptedGateway {
    upsert_outcomes: Mutex<VecDeque<bool>>,
    pub upserts: Mutex<Vec<Vec<Entry>>>,
    fetch_result: Mutex<Result<Vec<Value>, String>>,
    pub fetch_calls: Mutex<usize>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            upsert_outcomes: Mutex::new(VecDeque::new()),
            upserts: Mutex::new(Vec::new()),
            fetch_result: Mutex::new(Ok(Vec::new())),
            fetch_calls: Mutex::new(0),
            gate: None,
        }
    }

    pub fn with_upserts(outcomes: &[bool]) -> Self {
        let gateway = Self::new();
        gateway.upsert_outcomes.lock().unwrap().extend(outcomes.iter().copied());
        gateway
    }

    pub fn with_rows(rows: Vec<Value>) -> Self {
        let gateway = Self::new();
        *gateway.fetch_result.lock().unwrap() = Ok(rows);
        gateway
    }

    pub fn unreachable() -> Self {
        let gateway = Self::new();
        *gateway.fetch_result.lock().unwrap() = Err("connection refused".into());
        gateway
    }

    /// Blocks every upsert until the returned semaphore hands out a permit.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn last_upsert(&self) -> Option<Vec<Entry>> {
        self.upserts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn try_fetch_all(&self) -> CloudResult<Vec<RemoteRow>> {
        *self.fetch_calls.lock().unwrap() += 1;
        let result = self.fetch_result.lock().unwrap().clone();
        match result {
            Ok(rows) => Ok(rows
                .into_iter()
                .map(|row| serde_json::from_value(row).unwrap())
                .collect()),
            Err(message) => Err(CloudError::Api(message)),
        }
    }

    async fn try_upsert_batch(&self, entries: &[Entry]) -> CloudResult<()> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.upserts.lock().unwrap().push(entries.to_vec());
        let ok = self.upsert_outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if ok {
            Ok(())
        } else {
            Err(CloudError::Status {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }
}

// ── Fixtures ────────────────────────────────────────────────────

pub fn memory_snapshot() -> (Arc<MemoryMedium>, SnapshotStore) {
    let medium = Arc::new(MemoryMedium::new());
    let shared: Arc<dyn SnapshotMedium> = medium.clone();
    let snapshot = SnapshotStore::new(shared);
    (medium, snapshot)
}

pub fn zelda() -> Entry {
    Entry::with_id("zelda", EntryKind::Game, "Breath of the Wild").with_milestones(vec![
        Milestone::new("m1", "Great Plateau").done(),
        Milestone::new("m2", "Divine Beasts"),
        Milestone::new("m3", "Hyrule Castle"),
        Milestone::new("m4", "Credits"),
    ])
}

pub fn severance() -> Entry {
    Entry::with_id("severance", EntryKind::Show, "Severance").with_milestones(vec![
        Milestone::new("s1", "Season 1").done(),
        Milestone::new("s2", "Season 2"),
    ])
}

pub fn seed() -> Vec<Entry> {
    vec![zelda(), severance()]
}

/// A store over an in-memory medium, seeded with [`seed`].
pub fn store_with(gateway: Arc<ScriptedGateway>) -> EntryStore {
    let (_, snapshot) = memory_snapshot();
    EntryStore::builder(snapshot)
        .gateway(gateway)
        .seed(seed())
        .build()
        .unwrap()
}

/// Records every status an observer sees, starting with the current one.
pub fn record_statuses(store: &EntryStore) -> Arc<Mutex<Vec<SyncStatus>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe_status(move |status| sink.lock().unwrap().push(*status));
    seen
}
