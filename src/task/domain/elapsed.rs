//! Elapsed-time arithmetic for the task time ledger.
//!
//! Elapsed time is never ticked in process. It is derived on demand from
//! the stored interval start and the caller's notion of "now", so any
//! number of readers polling at any cadence observe the same value.

use chrono::{DateTime, Utc};

/// Whole seconds between `started_at` and `now`, clamped at zero.
///
/// A `started_at` in the future (clock skew between writers, or a corrupted
/// row) contributes nothing rather than a negative delta.
#[must_use]
pub fn open_interval_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let delta = now.signed_duration_since(started_at).num_seconds();
    u64::try_from(delta).unwrap_or(0)
}

/// Formats a second count as `hh:mm:ss`.
///
/// Hours are not wrapped at 24, matching the board's stopwatch display.
#[must_use]
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds.div_euclid(3600);
    let minutes = total_seconds.rem_euclid(3600).div_euclid(60);
    let seconds = total_seconds.rem_euclid(60);
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
