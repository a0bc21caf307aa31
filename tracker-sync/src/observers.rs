//! Callback registries for store subscribers.
//!
//! Values are queued while the publisher still holds the watch lock, so the
//! queue order is the publish order. Whichever thread finds the queue idle
//! drains it and runs the callbacks with no lock held; publishers that arrive
//! mid-drain leave their value for that thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

type Callback<V> = Arc<dyn Fn(&V) + Send + Sync>;

/// Shared across every registry, so a token names exactly one observer.
static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Token returned by `subscribe`; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Delivery<V> {
    queue: VecDeque<V>,
    draining: bool,
}

pub(crate) struct Observers<V> {
    callbacks: Mutex<Vec<(u64, Callback<V>)>>,
    delivery: Mutex<Delivery<V>>,
}

impl<V> Observers<V> {
    pub(crate) fn new() -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
            delivery: Mutex::new(Delivery {
                queue: VecDeque::new(),
                draining: false,
            }),
        }
    }

    pub(crate) fn add(&self, callback: Callback<V>) -> Subscription {
        let id = NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed);
        self.callbacks().push((id, callback));
        Subscription(id)
    }

    pub(crate) fn remove(&self, subscription: Subscription) -> bool {
        let mut callbacks = self.callbacks();
        let before = callbacks.len();
        callbacks.retain(|(id, _)| *id != subscription.0);
        callbacks.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks().len()
    }

    /// Queues `value` for delivery. Call while the value's publish lock is held.
    pub(crate) fn enqueue(&self, value: V) {
        self.delivery().queue.push_back(value);
    }

    /// Delivers queued values in order, unless another caller already is.
    ///
    /// A callback may subscribe, unsubscribe or mutate the store; values it
    /// publishes are delivered after it returns.
    pub(crate) fn flush(&self) {
        {
            let mut delivery = self.delivery();
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }
        let _unwind = DrainGuard(&self.delivery);

        loop {
            let value = {
                let mut delivery = self.delivery();
                match delivery.queue.pop_front() {
                    Some(value) => value,
                    None => {
                        // Cleared under the same lock as the empty check, so
                        // a concurrent enqueue is never stranded.
                        delivery.draining = false;
                        return;
                    }
                }
            };
            let callbacks: Vec<Callback<V>> =
                self.callbacks().iter().map(|(_, cb)| Arc::clone(cb)).collect();
            for callback in callbacks {
                callback(&value);
            }
        }
    }

    fn callbacks(&self) -> MutexGuard<'_, Vec<(u64, Callback<V>)>> {
        self.callbacks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn delivery(&self) -> MutexGuard<'_, Delivery<V>> {
        lock_delivery(&self.delivery)
    }
}

fn lock_delivery<V>(delivery: &Mutex<Delivery<V>>) -> MutexGuard<'_, Delivery<V>> {
    delivery.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clears the draining flag if a callback panics mid-drain.
struct DrainGuard<'a, V>(&'a Mutex<Delivery<V>>);

impl<V> Drop for DrainGuard<'_, V> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            lock_delivery(self.0).draining = false;
        }
    }
}
