/// Millisecond timestamp helpers
///
/// Bid records and live events carry Unix epoch milliseconds. Relative
/// order of bids within a listing is fixed by the commit section, not by
/// clock resolution, so a plain system-clock read is enough here.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in milliseconds.
#[inline]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
