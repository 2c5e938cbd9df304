use std::collections::HashMap;
use std::sync::Arc;

use autometrics::autometrics;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::Flusher;
use crate::convert::decode_seq;
use crate::convert::encode_seq;
use crate::metrics::record_cache_lookup;
use crate::BookError;
use crate::Datastore;
use crate::Error;
use crate::Facet;
use crate::MetaData;
use crate::PeerId;
use crate::PeerKeys;
use crate::Result;
use crate::API_SLO;

#[derive(Debug, Default)]
struct MetadataState {
    metadatas: HashMap<PeerId, MetaData>,
    claims: HashMap<PeerId, u64>,
    /// consecutive unanswered metadata requests, never persisted
    fetches: HashMap<PeerId, u64>,
}

/// Highest-sequence metadata, highest claimed sequence number and pending
/// fetch count of every peer.
///
/// The three tracks are reconciled against each other, so they share one
/// lock: once both exist, the claim is never below the metadata sequence
/// number.
pub struct MetadataBook {
    store: Arc<dyn Datastore>,
    keys: PeerKeys,
    state: Mutex<MetadataState>,
}

impl std::fmt::Debug for MetadataBook {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MetadataBook")
            .field("namespace", self.keys.namespace())
            .field("metadatas", &state.metadatas.len())
            .field("claims", &state.claims.len())
            .finish()
    }
}

impl MetadataBook {
    pub fn new(
        store: Arc<dyn Datastore>,
        keys: PeerKeys,
    ) -> Self {
        MetadataBook {
            store,
            keys,
            state: Mutex::new(MetadataState::default()),
        }
    }

    pub fn metadata(
        &self,
        id: &PeerId,
    ) -> Result<MetaData> {
        let mut state = self.state.lock();
        self.metadata_locked(&mut state, id)
    }

    pub fn claimed_seq(
        &self,
        id: &PeerId,
    ) -> Result<u64> {
        let mut state = self.state.lock();
        self.claimed_seq_locked(&mut state, id)
    }

    /// Records that `id` claims to be at metadata `seq`.
    ///
    /// Returns true when the claim is newer than the known one (or the first
    /// one). The fetch counter is left alone.
    #[autometrics(objective = API_SLO)]
    pub fn register_seq_claim(
        &self,
        id: &PeerId,
        seq: u64,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let prior = self.tolerate(self.claimed_seq_locked(&mut state, id), id, Facet::MetadataClaim);
        if prior.is_some_and(|prior| seq <= prior) {
            return Ok(false);
        }

        state.claims.insert(id.clone(), seq);
        self.persist_claim(id, seq)?;
        Ok(true)
    }

    /// Counts one more unanswered metadata request, returning the new count.
    pub fn register_meta_fetch(
        &self,
        id: &PeerId,
    ) -> u64 {
        let mut state = self.state.lock();
        let count = state.fetches.entry(id.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn meta_fetch_count(
        &self,
        id: &PeerId,
    ) -> u64 {
        self.state.lock().fetches.get(id).copied().unwrap_or(0)
    }

    /// Stores `metadata` when its sequence number is above the known one.
    ///
    /// Accepted metadata that reaches the current claim resets the fetch
    /// counter; metadata beyond the claim also raises the claim. The record is
    /// cached even when persisting it fails: the error is returned, the claim
    /// is left alone and a later flush retries the write.
    #[autometrics(objective = API_SLO)]
    pub fn register_metadata(
        &self,
        id: &PeerId,
        metadata: MetaData,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let prior = self
            .tolerate(self.metadata_locked(&mut state, id), id, Facet::Metadata)
            .map(|prior| prior.seq_number);
        if prior.is_some_and(|prior| prior >= metadata.seq_number) {
            return Ok(false);
        }

        let seq = metadata.seq_number;
        let encoded = metadata.encode();
        state.metadatas.insert(id.clone(), metadata);

        let claimed = self
            .tolerate(self.claimed_seq_locked(&mut state, id), id, Facet::MetadataClaim)
            .unwrap_or(0);
        if seq >= claimed {
            state.fetches.insert(id.clone(), 0);
        }
        self.store.put(&self.keys.facet(id, Facet::Metadata), encoded)?;

        if seq > claimed {
            state.claims.insert(id.clone(), seq);
            self.persist_claim(id, seq)?;
        }
        Ok(true)
    }

    fn metadata_locked(
        &self,
        state: &mut MetadataState,
        id: &PeerId,
    ) -> Result<MetaData> {
        if let Some(metadata) = state.metadatas.get(id) {
            record_cache_lookup("metadata", true);
            return Ok(metadata.clone());
        }
        record_cache_lookup("metadata", false);

        let bytes = self
            .store
            .get(&self.keys.facet(id, Facet::Metadata))?
            .ok_or_else(|| BookError::not_found(id, Facet::Metadata))?;
        let metadata = MetaData::decode(&bytes)
            .map_err(|e| BookError::decode(id, Facet::Metadata, e))?;
        trace!("loaded metadata seq {} of {} from store", metadata.seq_number, id);
        state.metadatas.insert(id.clone(), metadata.clone());
        Ok(metadata)
    }

    fn claimed_seq_locked(
        &self,
        state: &mut MetadataState,
        id: &PeerId,
    ) -> Result<u64> {
        if let Some(seq) = state.claims.get(id) {
            record_cache_lookup("claim", true);
            return Ok(*seq);
        }
        record_cache_lookup("claim", false);

        let bytes = self
            .store
            .get(&self.keys.facet(id, Facet::MetadataClaim))?
            .ok_or_else(|| BookError::not_found(id, Facet::MetadataClaim))?;
        let seq = decode_seq(&bytes).map_err(|e| BookError::decode(id, Facet::MetadataClaim, e))?;
        state.claims.insert(id.clone(), seq);
        Ok(seq)
    }

    /// A failed lookup counts as "nothing known yet" during reconciliation.
    fn tolerate<T>(
        &self,
        lookup: Result<T>,
        id: &PeerId,
        facet: Facet,
    ) -> Option<T> {
        match lookup {
            Ok(value) => Some(value),
            Err(e) => {
                if !e.is_not_found() {
                    warn!("treating unreadable {} of {} as absent: {}", facet, id, e);
                }
                None
            }
        }
    }

    fn persist_claim(
        &self,
        id: &PeerId,
        seq: u64,
    ) -> Result<()> {
        self.store.put(
            &self.keys.facet(id, Facet::MetadataClaim),
            Bytes::copy_from_slice(&encode_seq(seq)),
        )
    }
}

impl Flusher for MetadataBook {
    fn name(&self) -> &'static str {
        "metadata"
    }

    /// Persists every cached claim, then every cached metadata record.
    fn flush(&self) -> Result<()> {
        let state = self.state.lock();
        debug!(
            "flushing {} claims and {} metadata records",
            state.claims.len(),
            state.metadatas.len()
        );

        let mut errors = Vec::new();
        for (id, seq) in state.claims.iter() {
            if let Err(e) = self.persist_claim(id, *seq) {
                warn!("failed to persist claimed seq of {}: {}", id, e);
                errors.push(Error::persist(Facet::MetadataClaim, id, e));
            }
        }
        for (id, metadata) in state.metadatas.iter() {
            if let Err(e) = self
                .store
                .put(&self.keys.facet(id, Facet::Metadata), metadata.encode())
            {
                warn!("failed to persist metadata of {}: {}", id, e);
                errors.push(Error::persist(Facet::Metadata, id, e));
            }
        }
        Error::aggregate("flushing metadata cache", errors)
    }
}
