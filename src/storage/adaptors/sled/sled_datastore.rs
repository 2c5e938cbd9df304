use bytes::Bytes;
use sled::Tree;
use tracing::instrument;
use tracing::trace;

use super::init_sled_peer_db;
use crate::Batch;
use crate::Datastore;
use crate::Key;
use crate::Result;
use crate::StorageConfig;

/// Datastore over a single sled tree, keys stored as their UTF-8 path.
#[derive(Clone)]
pub struct SledDatastore {
    tree: Tree,
}

impl std::fmt::Debug for SledDatastore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledDatastore")
            .field("tree_len", &self.tree.len())
            .finish()
    }
}

impl SledDatastore {
    pub fn new(tree: Tree) -> Self {
        SledDatastore { tree }
    }

    /// Opens the database described by `config` and its peer tree.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let db = init_sled_peer_db(config)?;
        let tree = db.open_tree(&config.tree_name)?;
        Ok(SledDatastore { tree })
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl Datastore for SledDatastore {
    #[instrument(skip(self))]
    fn get(
        &self,
        key: &Key,
    ) -> Result<Option<Bytes>> {
        Ok(self.tree.get(key.as_bytes())?.map(|ivec| Bytes::copy_from_slice(&ivec)))
    }

    #[instrument(skip(self, value))]
    fn put(
        &self,
        key: &Key,
        value: Bytes,
    ) -> Result<()> {
        self.tree.insert(key.as_bytes(), value.as_ref())?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(
        &self,
        key: &Key,
    ) -> Result<()> {
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }

    fn batch(&self) -> Result<Box<dyn Batch>> {
        Ok(Box::new(SledBatch {
            tree: self.tree.clone(),
            batch: sled::Batch::default(),
            len: 0,
        }))
    }

    fn flush(&self) -> Result<()> {
        let bytes = self.tree.flush()?;
        trace!("flushed sled tree, bytes flushed: {}", bytes);
        Ok(())
    }
}

pub struct SledBatch {
    tree: Tree,
    batch: sled::Batch,
    len: usize,
}

impl Batch for SledBatch {
    fn put(
        &mut self,
        key: Key,
        value: Bytes,
    ) -> Result<()> {
        self.batch.insert(key.as_bytes(), value.as_ref());
        self.len += 1;
        Ok(())
    }

    fn delete(
        &mut self,
        key: Key,
    ) -> Result<()> {
        self.batch.remove(key.as_bytes());
        self.len += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        trace!(ops = self.len, "sled batch commit");
        self.tree.apply_batch(std::mem::take(&mut self.batch))?;
        self.len = 0;
        Ok(())
    }
}
