use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use bytes::Bytes;

use crate::Batch;
use crate::Datastore;
use crate::Key;
use crate::MemoryDatastore;
use crate::Result;
use crate::StorageError;

/// Memory store whose reads and writes can be switched to fail.
///
/// Writes to keys ending with `write_fail_suffix` fail while `fail_writes` is
/// set; an empty suffix matches every key.
#[derive(Debug, Default)]
pub struct FailingDatastore {
    pub inner: MemoryDatastore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_flush: AtomicBool,
    pub write_fail_suffix: parking_lot::Mutex<String>,
}

impl FailingDatastore {
    pub fn new(inner: MemoryDatastore) -> Self {
        FailingDatastore {
            inner,
            ..Default::default()
        }
    }

    pub fn fail_writes_to(
        &self,
        suffix: &str,
    ) {
        *self.write_fail_suffix.lock() = suffix.to_string();
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.fail_reads.store(false, Ordering::SeqCst);
        self.fail_writes.store(false, Ordering::SeqCst);
        self.fail_flush.store(false, Ordering::SeqCst);
    }

    fn write_fails(
        &self,
        key: &Key,
    ) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
            && key.as_str().ends_with(self.write_fail_suffix.lock().as_str())
    }
}

impl Datastore for FailingDatastore {
    fn get(
        &self,
        key: &Key,
    ) -> Result<Option<Bytes>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read {}", key)).into());
        }
        self.inner.get(key)
    }

    fn put(
        &self,
        key: &Key,
        value: Bytes,
    ) -> Result<()> {
        if self.write_fails(key) {
            return Err(StorageError::Unavailable(format!("put {}", key)).into());
        }
        self.inner.put(key, value)
    }

    fn delete(
        &self,
        key: &Key,
    ) -> Result<()> {
        if self.write_fails(key) {
            return Err(StorageError::Unavailable(format!("delete {}", key)).into());
        }
        self.inner.delete(key)
    }

    fn batch(&self) -> Result<Box<dyn Batch>> {
        self.inner.batch()
    }

    fn flush(&self) -> Result<()> {
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("flush".to_string()).into());
        }
        Ok(())
    }
}
