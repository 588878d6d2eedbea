//! Staleness evaluator: how long a cached record stays fresh, tiered by
//! lifecycle status. Refresh is purely pull-triggered - these TTLs are the
//! only thing deciding whether a read serves cache or refetches.

use chrono::{DateTime, Duration, Utc};

use crate::models::match_record::{CanonicalStatus, MatchRecord};

/// TTL tier for a status. Live matches churn every ball; terminal matches
/// only change if the provider amends the result. An UPCOMING match keeps
/// its 5-minute tier even after the liveness window has lapsed without the
/// provider ever reporting LIVE - polling frequency stays bounded for
/// "missed" matches.
pub fn refresh_tier(status: CanonicalStatus) -> Duration {
    match status {
        CanonicalStatus::Live => Duration::seconds(30),
        CanonicalStatus::Upcoming => Duration::minutes(5),
        CanonicalStatus::Completed | CanonicalStatus::Abandoned | CanonicalStatus::Cancelled => {
            Duration::hours(1)
        }
    }
}

/// A record is stale once its age reaches the tier for its status. A
/// record that has never been written (`updated_at` absent) is always
/// stale.
pub fn is_stale(record: &MatchRecord, now: DateTime<Utc>) -> bool {
    let updated_at = match record.updated_at {
        Some(ts) => ts.to_chrono(),
        None => return true,
    };

    now - updated_at >= refresh_tier(record.status)
}
