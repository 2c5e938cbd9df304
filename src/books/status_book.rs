use std::sync::Arc;

use autometrics::autometrics;
use dashmap::DashMap;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::Flusher;
use crate::metrics::record_cache_lookup;
use crate::BookError;
use crate::Datastore;
use crate::Error;
use crate::Facet;
use crate::PeerId;
use crate::PeerKeys;
use crate::Result;
use crate::Status;
use crate::API_SLO;

const BOOK: &str = "status";

/// Latest status of every peer, last write wins.
///
/// Lookups and updates of different peers never wait on each other. The cache
/// entry is released before the store write, so observers of that write may
/// read the book.
pub struct StatusBook {
    store: Arc<dyn Datastore>,
    keys: PeerKeys,
    statuses: DashMap<PeerId, Status>,
}

impl std::fmt::Debug for StatusBook {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("StatusBook")
            .field("namespace", self.keys.namespace())
            .field("cached", &self.statuses.len())
            .finish()
    }
}

impl StatusBook {
    pub fn new(
        store: Arc<dyn Datastore>,
        keys: PeerKeys,
    ) -> Self {
        StatusBook {
            store,
            keys,
            statuses: DashMap::new(),
        }
    }

    /// Cached status, loaded from the store on a miss.
    ///
    /// Fails with `BookError::NotFound` when the peer never reported one.
    pub fn status(
        &self,
        id: &PeerId,
    ) -> Result<Status> {
        if let Some(status) = self.statuses.get(id) {
            record_cache_lookup(BOOK, true);
            return Ok(*status);
        }
        record_cache_lookup(BOOK, false);

        let loaded = self.load(id)?;
        trace!("loaded status of {} from store", id);
        // a registration racing with this load already holds the newer value
        Ok(*self.statuses.entry(id.clone()).or_insert(loaded))
    }

    /// Replaces the cached status and persists it.
    ///
    /// A persistence failure is returned while the cache keeps the new value.
    #[autometrics(objective = API_SLO)]
    pub fn register_status(
        &self,
        id: &PeerId,
        status: Status,
    ) -> Result<()> {
        self.statuses.insert(id.clone(), status);
        self.store.put(&self.keys.facet(id, Facet::Status), status.encode())
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    fn load(
        &self,
        id: &PeerId,
    ) -> Result<Status> {
        let bytes = self
            .store
            .get(&self.keys.facet(id, Facet::Status))?
            .ok_or_else(|| BookError::not_found(id, Facet::Status))?;
        Status::decode(&bytes).map_err(|e| BookError::decode(id, Facet::Status, e).into())
    }
}

impl Flusher for StatusBook {
    fn name(&self) -> &'static str {
        BOOK
    }

    fn flush(&self) -> Result<()> {
        let snapshot: Vec<(PeerId, Status)> = self
            .statuses
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        debug!("flushing {} cached statuses", snapshot.len());

        let mut errors = Vec::new();
        for (id, status) in snapshot {
            if let Err(e) = self
                .store
                .put(&self.keys.facet(&id, Facet::Status), status.encode())
            {
                warn!("failed to persist status of {}: {}", id, e);
                errors.push(Error::persist(Facet::Status, &id, e));
            }
        }
        Error::aggregate("flushing status cache", errors)
    }
}
