//! `serialize_with` helpers for the exported peer view.

use std::fmt::Display;
use std::time::Duration;

use serde::Serializer;

/// `0x`-prefixed lowercase hex.
pub fn as_hex<T, S>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(value.as_ref())))
}

pub fn as_hex_opt<T, S>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    match value {
        Some(v) => as_hex(v, serializer),
        None => serializer.serialize_none(),
    }
}

pub fn as_display_opt<T, S>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

pub fn as_nanos<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
}
