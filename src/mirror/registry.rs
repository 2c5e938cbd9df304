use std::panic::catch_unwind;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use arc_swap::ArcSwap;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use tracing::error;
use tracing::warn;

use super::BatchItem;
use super::Observer;
use crate::Error;
use crate::Key;
use crate::OBSERVER_NOTIFICATIONS;
use crate::OBSERVER_PANICS;

type Observers = Vec<Arc<dyn Observer>>;

/// Concurrent set of observers, keyed by the identity of the shared handle.
///
/// Broadcasts read an immutable snapshot and never take the registry lock, so
/// adding or removing observers never waits on a slow observer. The lock is
/// private to the registry and independent of every book lock.
pub struct ObserverRegistry {
    writers: Mutex<Observers>,
    snapshot: ArcSwap<Observers>,
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let names: Vec<String> = self.snapshot.load().iter().map(|o| o.name()).collect();
        f.debug_struct("ObserverRegistry").field("observers", &names).finish()
    }
}

fn identity(observer: &Arc<dyn Observer>) -> *const () {
    Arc::as_ptr(observer) as *const ()
}

impl ObserverRegistry {
    pub fn new() -> Self {
        ObserverRegistry {
            writers: Mutex::new(Vec::new()),
            snapshot: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Registers `observer`. Returns true when it was already registered, in
    /// which case nothing changes.
    pub fn add(
        &self,
        observer: Arc<dyn Observer>,
    ) -> bool {
        let mut writers = self.writers.lock();
        if writers.iter().any(|o| identity(o) == identity(&observer)) {
            return true;
        }
        debug!("observer {} added", observer.name());
        writers.push(observer);
        self.snapshot.store(Arc::new(writers.clone()));
        false
    }

    /// Unregisters `observer`. Returns true when it was registered.
    pub fn remove(
        &self,
        observer: &Arc<dyn Observer>,
    ) -> bool {
        let mut writers = self.writers.lock();
        let before = writers.len();
        writers.retain(|o| identity(o) != identity(observer));
        if writers.len() == before {
            return false;
        }
        debug!("observer {} removed", observer.name());
        self.snapshot.store(Arc::new(writers.clone()));
        true
    }

    /// Observers registered at the time of the call.
    pub fn list(&self) -> Vec<Arc<dyn Observer>> {
        self.snapshot.load().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn notify_put(
        &self,
        key: &Key,
        value: &Bytes,
    ) {
        self.broadcast("put", |o| o.on_put(key, value));
    }

    pub(crate) fn notify_delete(
        &self,
        key: &Key,
    ) {
        self.broadcast("del", |o| o.on_delete(key));
    }

    pub(crate) fn notify_batch(
        &self,
        puts: &[BatchItem],
        deletes: &[Key],
    ) {
        self.broadcast("batch", |o| o.on_batch(puts, deletes));
    }

    /// Flushes every observer, collecting failures instead of stopping at the
    /// first one.
    pub(crate) fn flush_all(&self) -> Vec<Error> {
        let observers = self.snapshot.load_full();
        let mut errors = Vec::new();
        for observer in observers.iter() {
            match catch_unwind(AssertUnwindSafe(|| observer.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("observer {} failed to flush: {}", observer.name(), e);
                    errors.push(e);
                }
                Err(_) => {
                    let name = observer.name();
                    error!("observer {} panicked while flushing", name);
                    OBSERVER_PANICS.with_label_values(&[&name]).inc();
                }
            }
        }
        errors
    }

    fn broadcast<F>(
        &self,
        op: &str,
        notify: F,
    ) where
        F: Fn(&dyn Observer),
    {
        let observers = self.snapshot.load_full();
        for observer in observers.iter() {
            if catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref()))).is_err() {
                let name = observer.name();
                error!("observer {} panicked on {} notification", name, op);
                OBSERVER_PANICS.with_label_values(&[&name]).inc();
            }
        }
        OBSERVER_NOTIFICATIONS.with_label_values(&[op]).inc();
    }
}
