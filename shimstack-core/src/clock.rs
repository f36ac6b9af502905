//! Timestamps for emulated records

use chrono::{DateTime, Duration, Utc};

/// Current wall-clock time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time, but strictly later than `previous`.
///
/// Refreshed timestamps (table update time, parameter last-modified) must
/// move forward even when two writes land within the clock's resolution.
pub fn now_after(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
