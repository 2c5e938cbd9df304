use std::sync::Arc;

use bytes::Bytes;
use tracing::trace;

use super::BatchItem;
use super::ObserverRegistry;
use crate::Batch;
use crate::Datastore;
use crate::Key;
use crate::Result;
use crate::STORE_WRITE_FAILURES;

/// Datastore decorator that reports every write that landed to its observers.
///
/// Clones share the wrapped store and the observer registry.
#[derive(Clone)]
pub struct MirroredStore {
    inner: Arc<dyn Datastore>,
    observers: Arc<ObserverRegistry>,
}

impl std::fmt::Debug for MirroredStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("MirroredStore")
            .field("observers", &self.observers)
            .finish()
    }
}

impl MirroredStore {
    pub fn new(inner: Arc<dyn Datastore>) -> Self {
        Self::with_registry(inner, Arc::new(ObserverRegistry::new()))
    }

    pub fn with_registry(
        inner: Arc<dyn Datastore>,
        observers: Arc<ObserverRegistry>,
    ) -> Self {
        MirroredStore { inner, observers }
    }

    pub fn observers(&self) -> &Arc<ObserverRegistry> {
        &self.observers
    }

    /// Starts a batch on the wrapped store whose commit is reported to the
    /// observers as one `on_batch` call.
    pub fn begin_batch(&self) -> Result<MirroredBatch> {
        Ok(MirroredBatch {
            inner: self.inner.batch()?,
            observers: self.observers.clone(),
            puts: Vec::new(),
            deletes: Vec::new(),
        })
    }
}

impl Datastore for MirroredStore {
    fn get(
        &self,
        key: &Key,
    ) -> Result<Option<Bytes>> {
        self.inner.get(key)
    }

    fn put(
        &self,
        key: &Key,
        value: Bytes,
    ) -> Result<()> {
        if let Err(e) = self.inner.put(key, value.clone()) {
            STORE_WRITE_FAILURES.with_label_values(&["put"]).inc();
            return Err(e);
        }
        self.observers.notify_put(key, &value);
        Ok(())
    }

    fn delete(
        &self,
        key: &Key,
    ) -> Result<()> {
        if let Err(e) = self.inner.delete(key) {
            STORE_WRITE_FAILURES.with_label_values(&["del"]).inc();
            return Err(e);
        }
        self.observers.notify_delete(key);
        Ok(())
    }

    fn batch(&self) -> Result<Box<dyn Batch>> {
        Ok(Box::new(self.begin_batch()?))
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }
}

/// Batch handle that remembers what it forwarded to the wrapped batch.
///
/// The recorded puts and deletes outlive `commit`: call [`Batch::reset`]
/// before reusing the handle for unrelated writes.
pub struct MirroredBatch {
    inner: Box<dyn Batch>,
    observers: Arc<ObserverRegistry>,
    puts: Vec<BatchItem>,
    deletes: Vec<Key>,
}

impl MirroredBatch {
    pub fn puts(&self) -> &[BatchItem] {
        &self.puts
    }

    pub fn deletes(&self) -> &[Key] {
        &self.deletes
    }
}

impl Batch for MirroredBatch {
    fn put(
        &mut self,
        key: Key,
        value: Bytes,
    ) -> Result<()> {
        self.inner.put(key.clone(), value.clone())?;
        self.puts.push(BatchItem { key, value });
        Ok(())
    }

    fn delete(
        &mut self,
        key: Key,
    ) -> Result<()> {
        self.inner.delete(key.clone())?;
        self.deletes.push(key);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if let Err(e) = self.inner.commit() {
            STORE_WRITE_FAILURES.with_label_values(&["batch"]).inc();
            return Err(e);
        }
        trace!(
            puts = self.puts.len(),
            deletes = self.deletes.len(),
            "batch committed"
        );
        self.observers.notify_batch(&self.puts, &self.deletes);
        Ok(())
    }

    fn reset(&mut self) {
        self.puts.clear();
        self.deletes.clear();
    }
}
