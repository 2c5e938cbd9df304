//! The peer store: every per-peer book behind one handle, writing through a
//! mirrored datastore.

mod peer_view;
mod registry;

pub use peer_view::*;
pub use registry::*;


use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::CsvObserver;
use crate::Datastore;
use crate::EnrBook;
use crate::Error;
use crate::Flusher;
use crate::LogObserver;
use crate::MetaData;
use crate::MetadataBook;
use crate::MirroredStore;
use crate::NodeRecord;
use crate::Observer;
use crate::PeerId;
use crate::PeerKeys;
use crate::PeerstoreConfig;
use crate::Result;
use crate::ResultExt;
use crate::SledDatastore;
use crate::Status;
use crate::StatusBook;
use crate::CSV_OBSERVER_NAME;

/// Persistent per-peer state over a mirrored datastore.
///
/// Each book owns its own locking, so operations on different facets and
/// different peers proceed independently.
pub struct PeerStore<R: NodeRecord> {
    store: MirroredStore,
    registry: Arc<dyn PeerRegistry>,
    status_book: StatusBook,
    metadata_book: MetadataBook,
    enr_book: EnrBook<R>,
}

impl<R: NodeRecord> std::fmt::Debug for PeerStore<R> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PeerStore")
            .field("store", &self.store)
            .field("status_book", &self.status_book)
            .field("metadata_book", &self.metadata_book)
            .finish()
    }
}

impl<R: NodeRecord> PeerStore<R> {
    /// Builds the books over `store`, keying every facet under `namespace`.
    pub fn new(
        store: MirroredStore,
        registry: Arc<dyn PeerRegistry>,
        namespace: &str,
    ) -> Self {
        let keys = PeerKeys::new(namespace);
        let backing: Arc<dyn Datastore> = Arc::new(store.clone());
        PeerStore {
            status_book: StatusBook::new(backing.clone(), keys.clone()),
            metadata_book: MetadataBook::new(backing.clone(), keys.clone()),
            enr_book: EnrBook::new(backing, keys),
            store,
            registry,
        }
    }

    /// Opens the sled store described by `config` and attaches the observers
    /// it enables.
    pub fn open(
        config: &PeerstoreConfig,
        registry: Arc<dyn PeerRegistry>,
    ) -> Result<Self> {
        let sled = SledDatastore::open(&config.storage)?;
        let store = MirroredStore::new(Arc::new(sled));

        if config.observers.log_enabled {
            store
                .observers()
                .add(Arc::new(LogObserver::new(config.observers.level()?)));
        }
        if let Some(path) = &config.observers.csv_path {
            store
                .observers()
                .add(Arc::new(CsvObserver::create(CSV_OBSERVER_NAME, path)?));
        }
        info!(
            "peer store opened at {:?} with {} observer(s)",
            config.storage.db_path,
            store.observers().len()
        );

        Ok(Self::new(store, registry, &config.namespace))
    }

    // -
    // Observers

    /// Returns true when the observer was already attached.
    pub fn add_observer(
        &self,
        observer: Arc<dyn Observer>,
    ) -> bool {
        self.store.observers().add(observer)
    }

    /// Returns true when the observer was attached.
    pub fn remove_observer(
        &self,
        observer: &Arc<dyn Observer>,
    ) -> bool {
        self.store.observers().remove(observer)
    }

    pub fn list_observers(&self) -> Vec<Arc<dyn Observer>> {
        self.store.observers().list()
    }

    /// The mirrored store, for components that persist their own data next to
    /// the peer books.
    pub fn datastore(&self) -> &MirroredStore {
        &self.store
    }

    // -
    // Status

    pub fn status(
        &self,
        id: &PeerId,
    ) -> Result<Status> {
        self.status_book.status(id)
    }

    pub fn register_status(
        &self,
        id: &PeerId,
        status: Status,
    ) -> Result<()> {
        self.status_book.register_status(id, status)
    }

    // -
    // Metadata

    pub fn metadata(
        &self,
        id: &PeerId,
    ) -> Result<MetaData> {
        self.metadata_book.metadata(id)
    }

    pub fn claimed_seq(
        &self,
        id: &PeerId,
    ) -> Result<u64> {
        self.metadata_book.claimed_seq(id)
    }

    pub fn register_seq_claim(
        &self,
        id: &PeerId,
        seq: u64,
    ) -> Result<bool> {
        self.metadata_book.register_seq_claim(id, seq)
    }

    pub fn register_meta_fetch(
        &self,
        id: &PeerId,
    ) -> u64 {
        self.metadata_book.register_meta_fetch(id)
    }

    pub fn meta_fetch_count(
        &self,
        id: &PeerId,
    ) -> u64 {
        self.metadata_book.meta_fetch_count(id)
    }

    pub fn register_metadata(
        &self,
        id: &PeerId,
        metadata: MetaData,
    ) -> Result<bool> {
        self.metadata_book.register_metadata(id, metadata)
    }

    // -
    // Discovery records

    pub fn latest_enr(
        &self,
        id: &PeerId,
    ) -> Result<R> {
        self.enr_book.latest_enr(id)
    }

    pub fn update_enr_maybe(
        &self,
        id: &PeerId,
        record: &R,
    ) -> Result<bool> {
        self.enr_book.update_enr_maybe(id, record)
    }

    // -
    // Aggregate

    /// Assembles everything known about `id`.
    ///
    /// Facets the peer never reported are left empty; any other failure aborts
    /// with an error naming the facet.
    pub fn all_data(
        &self,
        id: &PeerId,
    ) -> Result<PeerView<R>> {
        let protocols = self
            .registry
            .protocols(id)
            .map_err(|e| Error::view("protocols", id, e))?;
        let user_agent = self
            .registry
            .user_agent(id)
            .map_err(|e| Error::view("user agent", id, e))?;
        let protocol_version = self
            .registry
            .protocol_version(id)
            .map_err(|e| Error::view("protocol version", id, e))?;
        let claimed_seq = self
            .claimed_seq(id)
            .optional()
            .map_err(|e| Error::view("claimed seq nr", id, e))?;
        let enr = self
            .latest_enr(id)
            .optional()
            .map_err(|e| Error::view("latest ENR", id, e))?;
        let metadata = self
            .metadata(id)
            .optional()
            .map_err(|e| Error::view("metadata", id, e))?;
        let status = self
            .status(id)
            .optional()
            .map_err(|e| Error::view("status", id, e))?;

        Ok(PeerView {
            peer_id: id.clone(),
            pubkey: self.registry.public_key(id),
            node_id: self.registry.node_id(id),
            addrs: self.registry.addrs(id),
            protocols,
            latency: self.registry.latency(id),
            user_agent,
            protocol_version,
            fork_info: enr.as_ref().and_then(|record| record.fork_info()),
            attnets: enr.as_ref().and_then(|record| record.attnets()),
            metadata,
            claimed_seq,
            status,
            enr,
        })
    }

    // -
    // Lifecycle

    fn flushers(&self) -> [&dyn Flusher; 3] {
        [&self.metadata_book, &self.status_book, &self.enr_book]
    }

    fn flush_books(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        for book in self.flushers() {
            if let Err(e) = book.flush() {
                warn!("flushing {} book failed: {}", book.name(), e);
                errors.extend(e.into_errors());
            }
        }
        errors
    }

    /// Writes every cached entry back to the store.
    pub fn flush(&self) -> Result<()> {
        Error::aggregate("flushing peerstore data", self.flush_books())
    }

    /// Flushes the books, then every observer, then the store itself.
    /// Every step runs even when an earlier one failed.
    pub fn close(&self) -> Result<()> {
        let mut errors = self.flush_books();
        errors.extend(self.store.observers().flush_all());
        if let Err(e) = self.store.flush() {
            warn!("flushing datastore failed: {}", e);
            errors.push(e);
        }
        debug!("peer store closed with {} error(s)", errors.len());
        Error::aggregate("closing peerstore", errors)
    }
}
