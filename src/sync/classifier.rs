//! Status classifier: provider free-text status → canonical lifecycle.
//!
//! The provider's status strings are unbounded ("Innings Break", "Match
//! starts at 14:00 GMT", "India won by 6 wickets", ...). Classification is
//! case-insensitive substring search against ordered pattern groups; group
//! order is the precedence rule and lives in one table so it can be tested
//! group by group.

use crate::models::match_record::CanonicalStatus;

/// Ordered pattern groups. Evaluated top to bottom, first hit wins; within
/// a group, longer patterns are listed before their substrings ("match
/// tied" before "tied") so the table itself encodes precedence.
const STATUS_PATTERNS: &[(CanonicalStatus, &[&str])] = &[
    (
        CanonicalStatus::Live,
        &[
            "live",
            "in progress",
            "innings break",
            "rain delay",
            "tea break",
            "lunch break",
            "drinks break",
        ],
    ),
    (
        CanonicalStatus::Completed,
        &[
            "complete",
            "finished",
            "won by",
            "match tied",
            "no result",
            "result",
            "won",
            "lost",
            "draw",
            "tied",
        ],
    ),
    (CanonicalStatus::Abandoned, &["abandon", "washed out"]),
    (CanonicalStatus::Cancelled, &["cancel", "postponed"]),
    (
        CanonicalStatus::Upcoming,
        &["match starts", "starts at", "upcoming", "scheduled", "preview"],
    ),
];

/// Classify a provider status string. `default_when_unknown` covers text
/// matching no pattern group: list-feed call sites pass UPCOMING, the
/// live-list call site passes LIVE (absence of a terminal pattern in a
/// live feed means the match is still in progress).
///
/// Never fails; null/empty input classifies as UPCOMING.
pub fn classify(raw_status: Option<&str>, default_when_unknown: CanonicalStatus) -> CanonicalStatus {
    let text = match raw_status {
        Some(s) if !s.trim().is_empty() => s.to_lowercase(),
        _ => return CanonicalStatus::Upcoming,
    };

    for (status, patterns) in STATUS_PATTERNS {
        if patterns.iter().any(|p| text.contains(p)) {
            return *status;
        }
    }

    // Strings like "14:30 GMT" carry a start time but none of the UPCOMING
    // keywords; read them as a scheduled match.
    if contains_time_token(&text) {
        return CanonicalStatus::Upcoming;
    }

    default_when_unknown
}

/// Crude HH:MM / timezone-abbreviation scan for the fallback rule.
fn contains_time_token(text: &str) -> bool {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':'
            && i > 0
            && i + 1 < bytes.len()
            && bytes[i - 1].is_ascii_digit()
            && bytes[i + 1].is_ascii_digit()
        {
            return true;
        }
    }

    const TZ_ABBREVS: &[&str] = &["gmt", "ist", "utc", "bst", "aest", "pkt", "sast"];
    text.split(|c: char| !c.is_ascii_alphabetic())
        .any(|word| TZ_ABBREVS.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(raw: Option<&str>) -> CanonicalStatus {
        classify(raw, CanonicalStatus::Upcoming)
    }

    #[test]
    fn null_and_empty_default_to_upcoming() {
        assert_eq!(classify_default(None), CanonicalStatus::Upcoming);
        assert_eq!(classify_default(Some("")), CanonicalStatus::Upcoming);
        assert_eq!(classify_default(Some("   ")), CanonicalStatus::Upcoming);
    }

    #[test]
    fn live_patterns() {
        for s in [
            "Live",
            "Match in progress",
            "Innings Break",
            "Rain delay",
            "Tea Break",
            "Lunch Break",
            "Drinks break",
        ] {
            assert_eq!(classify_default(Some(s)), CanonicalStatus::Live, "{}", s);
        }
    }

    #[test]
    fn completed_patterns() {
        for s in [
            "Match Complete",
            "Finished",
            "India won by 6 wickets",
            "Match tied",
            "No result",
            "Match drawn",
        ] {
            assert_eq!(classify_default(Some(s)), CanonicalStatus::Completed, "{}", s);
        }
    }

    #[test]
    fn match_tied_is_completed_not_abandoned() {
        // "tied" must be matched as part of the COMPLETED group, never as
        // a shorthand for abandoned.
        assert_eq!(classify_default(Some("Match tied")), CanonicalStatus::Completed);
        assert_eq!(
            classify_default(Some("Match tied (Eng win one-over eliminator)")),
            CanonicalStatus::Completed
        );
    }

    #[test]
    fn no_result_is_completed_not_upcoming() {
        assert_eq!(classify_default(Some("No result")), CanonicalStatus::Completed);
        assert_eq!(
            classify_default(Some("No result - rain stopped play")),
            CanonicalStatus::Completed
        );
    }

    #[test]
    fn abandoned_and_cancelled_patterns() {
        assert_eq!(classify_default(Some("Match abandoned")), CanonicalStatus::Abandoned);
        assert_eq!(classify_default(Some("Washed out")), CanonicalStatus::Abandoned);
        assert_eq!(classify_default(Some("Cancelled")), CanonicalStatus::Cancelled);
        assert_eq!(classify_default(Some("Match postponed")), CanonicalStatus::Cancelled);
    }

    #[test]
    fn upcoming_patterns() {
        for s in [
            "Match starts at 14:00 GMT",
            "Starts at 09:30",
            "Upcoming",
            "Scheduled",
            "Preview",
        ] {
            assert_eq!(classify_default(Some(s)), CanonicalStatus::Upcoming, "{}", s);
        }
    }

    #[test]
    fn live_group_outranks_completed_group() {
        // Group order is the precedence rule: a string with markers from
        // both groups resolves to the first group in the table.
        assert_eq!(
            classify_default(Some("Rain delay: result expected later")),
            CanonicalStatus::Live
        );
        assert_eq!(classify_default(Some("Rain delay")), CanonicalStatus::Live);
    }

    #[test]
    fn time_token_fallback_reads_as_upcoming() {
        assert_eq!(classify_default(Some("14:30")), CanonicalStatus::Upcoming);
        assert_eq!(classify_default(Some("Play begins 10:00 IST")), CanonicalStatus::Upcoming);
        assert_eq!(classify_default(Some("GMT slot tbc")), CanonicalStatus::Upcoming);
    }

    #[test]
    fn unknown_text_uses_the_passed_default() {
        assert_eq!(
            classify(Some("some gibberish"), CanonicalStatus::Upcoming),
            CanonicalStatus::Upcoming
        );
        // Live-list call sites invert the fallback.
        assert_eq!(
            classify(Some("some gibberish"), CanonicalStatus::Live),
            CanonicalStatus::Live
        );
        // But an explicit pattern always wins over the default.
        assert_eq!(
            classify(Some("India won by 6 wickets"), CanonicalStatus::Live),
            CanonicalStatus::Completed
        );
    }
}
