use std::time::Duration;

use serde::Serialize;

use super::convert::decode_seq;
use super::convert::encode_seq;
use super::serde_helpers::as_display_opt;
use super::serde_helpers::as_hex;
use super::serde_helpers::as_hex_opt;
use super::serde_helpers::as_nanos;
use super::time::now_millis;
use crate::DecodeError;

#[test]
fn test_seq_is_little_endian() {
    assert_eq!(encode_seq(1), [1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(decode_seq([0xff, 0, 0, 0, 0, 0, 0, 0x01]).unwrap(), 0x0100_0000_0000_00ff);
    assert_eq!(decode_seq(encode_seq(u64::MAX)).unwrap(), u64::MAX);
}

#[test]
fn test_decode_seq_rejects_wrong_length() {
    assert_eq!(
        decode_seq([1u8, 2, 3]),
        Err(DecodeError::InvalidLength {
            expected: 8,
            actual: 3
        })
    );
    assert!(decode_seq([0u8; 9]).is_err());
    assert!(decode_seq([0u8; 0]).is_err());
}

#[derive(Serialize)]
struct Sample {
    #[serde(serialize_with = "as_hex")]
    digest: [u8; 2],
    #[serde(serialize_with = "as_hex_opt")]
    maybe: Option<Vec<u8>>,
    #[serde(serialize_with = "as_display_opt")]
    label: Option<u32>,
    #[serde(serialize_with = "as_nanos")]
    latency: Duration,
}

#[test]
fn test_serde_helpers_format_fields() {
    let sample = Sample {
        digest: [0xab, 0x01],
        maybe: None,
        label: Some(7),
        latency: Duration::from_micros(3),
    };
    let json = serde_json::to_value(&sample).unwrap();
    assert_eq!(json["digest"], "0xab01");
    assert!(json["maybe"].is_null());
    assert_eq!(json["label"], "7");
    assert_eq!(json["latency"], 3000);
}

#[test]
fn test_now_millis_moves_forward() {
    let t1 = now_millis();
    std::thread::sleep(Duration::from_millis(2));
    assert!(now_millis() >= t1);
}
