use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// return millisecond since unix epoch, 0 if the clock is set before it
pub(crate) fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
