//! Transactional key-value store capability the peer books persist through.
//!
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::Key;
use crate::Result;

#[cfg_attr(test, automock)]
pub trait Datastore: Send + Sync + 'static {
    /// `Ok(None)` when the key was never written or has been deleted.
    fn get(
        &self,
        key: &Key,
    ) -> Result<Option<Bytes>>;

    fn put(
        &self,
        key: &Key,
        value: Bytes,
    ) -> Result<()>;

    fn delete(
        &self,
        key: &Key,
    ) -> Result<()>;

    /// Starts an atomic batch. Nothing is visible until `commit` succeeds.
    fn batch(&self) -> Result<Box<dyn Batch>>;

    /// Pushes buffered writes to durable storage. Stores that write through
    /// keep the no-op default.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg_attr(test, automock)]
pub trait Batch: Send {
    fn put(
        &mut self,
        key: Key,
        value: Bytes,
    ) -> Result<()>;

    fn delete(
        &mut self,
        key: Key,
    ) -> Result<()>;

    /// Applies every buffered operation atomically.
    ///
    /// Handles that keep a record of what they forwarded hold on to it until
    /// [`reset`](Batch::reset); call it before reusing the handle.
    fn commit(&mut self) -> Result<()>;

    /// Discards whatever the handle still holds about earlier operations.
    /// Committed data is not affected.
    fn reset(&mut self) {}
}
