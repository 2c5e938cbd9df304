use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::trace;

use crate::Batch;
use crate::Datastore;
use crate::Key;
use crate::Result;

/// In-memory datastore.
///
/// Clones share the same underlying map, which lets tests drop every book
/// and rebuild them on top of the "persisted" data.
#[derive(Debug, Default, Clone)]
pub struct MemoryDatastore {
    data: Arc<RwLock<HashMap<Key, Bytes>>>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Datastore for MemoryDatastore {
    fn get(
        &self,
        key: &Key,
    ) -> Result<Option<Bytes>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(
        &self,
        key: &Key,
        value: Bytes,
    ) -> Result<()> {
        trace!(%key, len = value.len(), "memory put");
        self.data.write().insert(key.clone(), value);
        Ok(())
    }

    fn delete(
        &self,
        key: &Key,
    ) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn batch(&self) -> Result<Box<dyn Batch>> {
        Ok(Box::new(MemoryBatch {
            data: self.data.clone(),
            ops: Vec::new(),
        }))
    }
}

#[derive(Debug)]
enum BatchOp {
    Put(Key, Bytes),
    Delete(Key),
}

/// Buffers operations and applies them under one write lock.
#[derive(Debug)]
pub struct MemoryBatch {
    data: Arc<RwLock<HashMap<Key, Bytes>>>,
    ops: Vec<BatchOp>,
}

impl Batch for MemoryBatch {
    fn put(
        &mut self,
        key: Key,
        value: Bytes,
    ) -> Result<()> {
        self.ops.push(BatchOp::Put(key, value));
        Ok(())
    }

    fn delete(
        &mut self,
        key: Key,
    ) -> Result<()> {
        self.ops.push(BatchOp::Delete(key));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        trace!(ops = self.ops.len(), "memory batch commit");
        let mut data = self.data.write();
        for op in self.ops.drain(..) {
            match op {
                BatchOp::Put(key, value) => {
                    data.insert(key, value);
                }
                BatchOp::Delete(key) => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}
