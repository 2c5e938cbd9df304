use crate::MetaData;
use crate::PeerId;
use crate::PeerKeys;
use crate::Status;

pub(crate) fn peer(n: u8) -> PeerId {
    PeerId::from(vec![0x08, 0x02, 0x12, 0x20, n])
}

/// Status whose head slot identifies it in assertions.
pub(crate) fn status(head_slot: u64) -> Status {
    Status {
        fork_digest: [0xb5, 0x30, 0x3f, 0x2a],
        finalized_root: [0x11; 32],
        finalized_epoch: head_slot / 32,
        head_root: [0x22; 32],
        head_slot,
    }
}

pub(crate) fn metadata(seq: u64) -> MetaData {
    MetaData::new(seq, vec![seq as u8; 8])
}

pub(crate) fn keys() -> PeerKeys {
    PeerKeys::default()
}
