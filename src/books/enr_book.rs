use std::marker::PhantomData;
use std::sync::Arc;

use autometrics::autometrics;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use tracing::warn;

use super::Flusher;
use crate::BookError;
use crate::Datastore;
use crate::DecodeError;
use crate::Facet;
use crate::NodeRecord;
use crate::PeerId;
use crate::PeerKeys;
use crate::Result;
use crate::API_SLO;

/// Latest discovery record of every peer, kept only in the store.
///
/// Records are persisted as their text form and replaced only by records with
/// a strictly higher sequence number.
pub struct EnrBook<R: NodeRecord> {
    store: Arc<dyn Datastore>,
    keys: PeerKeys,
    /// serializes compare-and-write so concurrent updates cannot regress
    update: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: NodeRecord> std::fmt::Debug for EnrBook<R> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("EnrBook")
            .field("namespace", self.keys.namespace())
            .finish()
    }
}

impl<R: NodeRecord> EnrBook<R> {
    pub fn new(
        store: Arc<dyn Datastore>,
        keys: PeerKeys,
    ) -> Self {
        EnrBook {
            store,
            keys,
            update: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Fails with `BookError::NotFound` when nothing is stored and with
    /// `BookError::Decode` when the stored text is not a valid record.
    pub fn latest_enr(
        &self,
        id: &PeerId,
    ) -> Result<R> {
        let bytes = self
            .store
            .get(&self.keys.facet(id, Facet::Enr))?
            .ok_or_else(|| BookError::not_found(id, Facet::Enr))?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| BookError::decode(id, Facet::Enr, DecodeError::InvalidUtf8))?;
        R::parse(text).map_err(|e| BookError::decode(id, Facet::Enr, e).into())
    }

    /// Persists `record` when it is the first one or newer than the stored
    /// one. Returns whether it was written.
    #[autometrics(objective = API_SLO)]
    pub fn update_enr_maybe(
        &self,
        id: &PeerId,
        record: &R,
    ) -> Result<bool> {
        let _guard = self.update.lock();
        let current = match self.latest_enr(id) {
            Ok(current) => Some(current.seq()),
            Err(e) => {
                if !e.is_not_found() {
                    warn!("replacing unreadable enr of {}: {}", id, e);
                }
                None
            }
        };
        if current.is_some_and(|current| record.seq() <= current) {
            return Ok(false);
        }

        debug!("updating enr of {} to seq {}", id, record.seq());
        self.store.put(
            &self.keys.facet(id, Facet::Enr),
            Bytes::from(record.to_string()),
        )?;
        Ok(true)
    }
}

impl<R: NodeRecord> Flusher for EnrBook<R> {
    fn name(&self) -> &'static str {
        "enr"
    }
}
