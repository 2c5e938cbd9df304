use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use peerbook::DecodeError;
use peerbook::NodeRecord;
use peerbook::PeerId;
use peerbook::PeerRegistry;
use peerbook::PeerStore;
use peerbook::PeerstoreConfig;
use peerbook::Result;
use peerbook::Status;
use peerbook::StorageConfig;

/// Discovery record whose text form is `rec-<seq>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord(pub u64);

impl fmt::Display for SeqRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "rec-{}", self.0)
    }
}

impl NodeRecord for SeqRecord {
    fn parse(text: &str) -> std::result::Result<Self, DecodeError> {
        text.strip_prefix("rec-")
            .and_then(|seq| seq.parse().ok())
            .map(SeqRecord)
            .ok_or_else(|| DecodeError::Parse(text.to_string()))
    }

    fn seq(&self) -> u64 {
        self.0
    }
}

/// Registry of a host that knows nothing about its peers yet.
#[derive(Debug, Default)]
pub struct EmptyRegistry;

impl PeerRegistry for EmptyRegistry {
    fn addrs(
        &self,
        _id: &PeerId,
    ) -> Vec<String> {
        Vec::new()
    }

    fn protocols(
        &self,
        _id: &PeerId,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn latency(
        &self,
        _id: &PeerId,
    ) -> Duration {
        Duration::ZERO
    }

    fn public_key(
        &self,
        _id: &PeerId,
    ) -> Option<Bytes> {
        None
    }

    fn node_id(
        &self,
        _id: &PeerId,
    ) -> Option<Bytes> {
        None
    }

    fn user_agent(
        &self,
        _id: &PeerId,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    fn protocol_version(
        &self,
        _id: &PeerId,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

pub fn config_at(dir: &Path) -> PeerstoreConfig {
    PeerstoreConfig {
        storage: StorageConfig {
            db_path: dir.join("peerstore"),
            flush_every_ms: None,
            ..StorageConfig::default()
        },
        ..PeerstoreConfig::default()
    }
}

pub fn open(config: &PeerstoreConfig) -> PeerStore<SeqRecord> {
    PeerStore::open(config, Arc::new(EmptyRegistry)).expect("open peer store")
}

pub fn status_at(head_slot: u64) -> Status {
    Status {
        fork_digest: [0x6a, 0x95, 0xa1, 0xa9],
        head_slot,
        ..Status::default()
    }
}
