use crate::DecodeError;

/// Width of a persisted sequence number.
pub const SEQ_LENGTH: usize = 8;

/// Converts a sequence number to its persisted little-endian form.
///
/// # Examples
/// ```
/// use peerbook::convert::encode_seq;
///
/// assert_eq!(encode_seq(0x0102), [0x02, 0x01, 0, 0, 0, 0, 0, 0]);
/// ```
pub const fn encode_seq(seq: u64) -> [u8; SEQ_LENGTH] {
    seq.to_le_bytes()
}

pub fn decode_seq<K: AsRef<[u8]>>(bytes: K) -> Result<u64, DecodeError> {
    let bytes = bytes.as_ref();
    let array: [u8; SEQ_LENGTH] = bytes.try_into().map_err(|_| DecodeError::InvalidLength {
        expected: SEQ_LENGTH,
        actual: bytes.len(),
    })?;
    Ok(u64::from_le_bytes(array))
}
