//! Tracking for fire-and-forget sync tasks.

use std::future::Future;
use std::sync::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::error;

/// Spawns background tasks on a runtime and lets callers wait for all of them.
pub(crate) struct BackgroundTasks {
    runtime: Handle,
    set: Mutex<JoinSet<()>>,
}

impl BackgroundTasks {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            set: Mutex::new(JoinSet::new()),
        }
    }

    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut set = self.lock();
        // Reap finished tasks so the set does not grow for the whole session.
        while let Some(result) = set.try_join_next() {
            log_join_failure(result);
        }
        set.spawn_on(task, &self.runtime);
    }

    /// Waits until every task spawned so far, and any they spawn, has finished.
    pub(crate) async fn settle(&self) {
        loop {
            let mut drained = std::mem::take(&mut *self.lock());
            if drained.is_empty() {
                return;
            }
            while let Some(result) = drained.join_next().await {
                log_join_failure(result);
            }
        }
    }

    /// Number of tasks that have not finished yet.
    pub(crate) fn in_flight(&self) -> usize {
        let mut set = self.lock();
        while let Some(result) = set.try_join_next() {
            log_join_failure(result);
        }
        set.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn log_join_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!("background sync task panicked: {e}");
        }
    }
}
