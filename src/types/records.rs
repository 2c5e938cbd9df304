//! Per-peer records and their persisted byte layouts.
//!
//! `Status` and `MetaData` use the fixed little-endian layout of the consensus
//! p2p schema. Discovery records are only known through the [`NodeRecord`]
//! trait; parsing and signature checks belong to the record implementation.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::convert::decode_seq;
use crate::convert::encode_seq;
use crate::utils::serde_helpers::as_hex;
use crate::DecodeError;

/// Serialized length of [`Status`].
pub const STATUS_LENGTH: usize = 4 + 32 + 8 + 32 + 8;

/// Minimum serialized length of [`MetaData`]: the sequence number alone.
pub const METADATA_MIN_LENGTH: usize = 8;

/// Latest chain status a peer reported during the status handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Status {
    #[serde(serialize_with = "as_hex")]
    pub fork_digest: [u8; 4],
    #[serde(serialize_with = "as_hex")]
    pub finalized_root: [u8; 32],
    pub finalized_epoch: u64,
    #[serde(serialize_with = "as_hex")]
    pub head_root: [u8; 32],
    pub head_slot: u64,
}

impl Status {
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(STATUS_LENGTH);
        out.extend_from_slice(&self.fork_digest);
        out.extend_from_slice(&self.finalized_root);
        out.extend_from_slice(&self.finalized_epoch.to_le_bytes());
        out.extend_from_slice(&self.head_root);
        out.extend_from_slice(&self.head_slot.to_le_bytes());
        Bytes::from(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != STATUS_LENGTH {
            return Err(DecodeError::InvalidLength {
                expected: STATUS_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Status {
            fork_digest: read_array(bytes, 0),
            finalized_root: read_array(bytes, 4),
            finalized_epoch: u64::from_le_bytes(read_array(bytes, 36)),
            head_root: read_array(bytes, 44),
            head_slot: u64::from_le_bytes(read_array(bytes, 76)),
        })
    }
}

/// Capability metadata a peer serves, ordered by `seq_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaData {
    pub seq_number: u64,
    /// Remaining schema fields (subnet bitfields, ...), opaque to the book.
    #[serde(serialize_with = "as_hex")]
    pub payload: Bytes,
}

impl MetaData {
    pub fn new(
        seq_number: u64,
        payload: impl Into<Bytes>,
    ) -> Self {
        MetaData {
            seq_number,
            payload: payload.into(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(METADATA_MIN_LENGTH + self.payload.len());
        out.extend_from_slice(&encode_seq(self.seq_number));
        out.extend_from_slice(&self.payload);
        Bytes::from(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < METADATA_MIN_LENGTH {
            return Err(DecodeError::TooShort {
                minimum: METADATA_MIN_LENGTH,
                actual: bytes.len(),
            });
        }
        let (seq, payload) = bytes.split_at(METADATA_MIN_LENGTH);
        Ok(MetaData {
            seq_number: decode_seq(seq)?,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

/// Fork schedule a node advertises in its discovery record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForkInfo {
    #[serde(serialize_with = "as_hex")]
    pub fork_digest: [u8; 4],
    #[serde(serialize_with = "as_hex")]
    pub next_fork_version: [u8; 4],
    pub next_fork_epoch: u64,
}

/// Signed, self-published node record (an ENR).
///
/// `Display` must produce the canonical text form, which is what gets
/// persisted; `parse` must accept it back.
pub trait NodeRecord: fmt::Display + fmt::Debug + Clone + Send + Sync + 'static {
    fn parse(text: &str) -> Result<Self, DecodeError>;

    fn seq(&self) -> u64;

    /// Fork data from the record's extension entries, if it carries any.
    fn fork_info(&self) -> Option<ForkInfo> {
        None
    }

    /// Attestation subnet bitfield from the record's extension entries.
    fn attnets(&self) -> Option<Bytes> {
        None
    }
}

fn read_array<const N: usize>(
    bytes: &[u8],
    offset: usize,
) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}
