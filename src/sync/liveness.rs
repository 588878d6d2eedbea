//! Liveness heuristic: the provider's "upcoming" feeds lag actual match
//! starts, so an UPCOMING match whose start time has recently passed is
//! assumed LIVE. The window bounds how long that assumption holds before
//! we go back to requiring an explicit provider status.

use chrono::{DateTime, Duration, Utc};

use crate::models::match_record::CanonicalStatus;

/// How long after its start time an unconfirmed match is assumed live.
pub const LIVENESS_WINDOW_HOURS: i64 = 8;

pub fn liveness_window() -> Duration {
    Duration::hours(LIVENESS_WINDOW_HOURS)
}

/// Promote a stale UPCOMING classification to LIVE when the start time has
/// passed but is within the liveness window. Identity for every other
/// status. Runs before the merge engine's terminality check, so a
/// genuinely completed match is never reopened.
pub fn apply_liveness_override(
    status: CanonicalStatus,
    start_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CanonicalStatus {
    if status == CanonicalStatus::Upcoming
        && start_date <= now
        && now - start_date < liveness_window()
    {
        return CanonicalStatus::Live;
    }
    status
}
