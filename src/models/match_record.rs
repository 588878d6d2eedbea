use bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

/// Canonical lifecycle of a cached match. The provider only ever gives us
/// free-text status strings; everything downstream works off this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalStatus {
    Upcoming,
    Live,
    Completed,
    Abandoned,
    Cancelled,
}

impl CanonicalStatus {
    /// Terminal statuses must never be overwritten by re-classification,
    /// only by an explicit admin override.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CanonicalStatus::Completed | CanonicalStatus::Abandoned | CanonicalStatus::Cancelled
        )
    }

    pub fn is_live(&self) -> bool {
        matches!(self, CanonicalStatus::Live)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Upcoming => "upcoming",
            CanonicalStatus::Live => "live",
            CanonicalStatus::Completed => "completed",
            CanonicalStatus::Abandoned => "abandoned",
            CanonicalStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upcoming" => Some(CanonicalStatus::Upcoming),
            "live" => Some(CanonicalStatus::Live),
            "completed" => Some(CanonicalStatus::Completed),
            "abandoned" => Some(CanonicalStatus::Abandoned),
            "cancelled" => Some(CanonicalStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    T20,
    Odi,
    Test,
    T10,
    Hundred,
    Other,
}

impl MatchFormat {
    /// Provider format strings come in several spellings ("T20", "t20i",
    /// "ODI", "TEST", "The Hundred", ...).
    pub fn from_provider(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("t20") || lowered.contains("twenty") {
            MatchFormat::T20
        } else if lowered.contains("odi") || lowered.contains("one day") {
            MatchFormat::Odi
        } else if lowered.contains("test") {
            MatchFormat::Test
        } else if lowered.contains("t10") {
            MatchFormat::T10
        } else if lowered.contains("hundred") {
            MatchFormat::Hundred
        } else {
            MatchFormat::Other
        }
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        MatchFormat::Other
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub series_type: String,
}

/// One team's aggregate score line. All fields degrade to zero when the
/// provider payload is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    #[serde(default)]
    pub runs: i64,
    #[serde(default)]
    pub wickets: i64,
    #[serde(default)]
    pub overs: f64,
    #[serde(default)]
    pub balls: i64,
    #[serde(default)]
    pub run_rate: f64,
    #[serde(default)]
    pub required_run_rate: f64,
}

impl ScoreLine {
    pub fn is_zero(&self) -> bool {
        self.runs == 0
            && self.wickets == 0
            && self.overs == 0.0
            && self.balls == 0
            && self.run_rate == 0.0
            && self.required_run_rate == 0.0
    }

    /// True when at least one numeric field carries real data.
    pub fn has_data(&self) -> bool {
        !self.is_zero()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub team_short_name: String,
    #[serde(default)]
    pub score: ScoreLine,
}

/// A separately-fetched provider blob (scorecard, commentary, overs, ...)
/// stored verbatim with its own freshness stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubResourceBlob {
    pub data: Value,
    pub last_updated: BsonDateTime,
}

/// The cache unit: one document per distinct match, keyed by the
/// provider-assigned match id. Matches the `matches` collection exactly.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,

    pub status: CanonicalStatus,

    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_title: String,
    #[serde(default)]
    pub sub_title: String,

    #[serde(default)]
    pub format: MatchFormat,

    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub series: SeriesInfo,

    pub start_date: BsonDateTime,
    pub end_date: Option<BsonDateTime>,

    /// Always exactly 0 or 2 entries; order (team1, team2) is stable for
    /// the lifetime of the record.
    #[serde(default)]
    pub teams: Vec<TeamScore>,

    /// Derived, kept equal to `status == live`.
    pub is_live: bool,

    /// Ordering hint for "most relevant first" listings.
    #[serde(default)]
    pub priority: i64,

    pub scorecard: Option<SubResourceBlob>,
    pub historical_scorecard: Option<SubResourceBlob>,
    pub commentary: Option<SubResourceBlob>,
    pub historical_commentary: Option<SubResourceBlob>,
    pub overs: Option<SubResourceBlob>,

    /// Latest raw provider payload, retained for re-derivation. Consumers
    /// never interpret this.
    pub raw: Option<Value>,

    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,

    /// Optimistic-concurrency stamp, bumped on every upsert.
    #[serde(default)]
    pub version: i64,
}

impl MatchRecord {
    /// Fresh record skeleton for a match we have never cached before.
    pub fn new(match_id: impl Into<String>, start_date: BsonDateTime) -> Self {
        MatchRecord {
            match_id: match_id.into(),
            status: CanonicalStatus::Upcoming,
            title: String::new(),
            short_title: String::new(),
            sub_title: String::new(),
            format: MatchFormat::Other,
            venue: Venue::default(),
            series: SeriesInfo::default(),
            start_date,
            end_date: None,
            teams: Vec::new(),
            is_live: false,
            priority: 0,
            scorecard: None,
            historical_scorecard: None,
            commentary: None,
            historical_commentary: None,
            overs: None,
            raw: None,
            created_at: None,
            updated_at: None,
            version: 0,
        }
    }

    /// Re-derive the `is_live` flag after any status change.
    pub fn sync_is_live(&mut self) {
        self.is_live = self.status.is_live();
    }

    /// True when every cached team score is all-zero (or no teams at all).
    pub fn has_score_data(&self) -> bool {
        self.teams.iter().any(|t| t.score.has_data())
    }
}

/// The sub-resources a detail request may ask the orchestrator to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResourceKind {
    Scorecard,
    HistoricalScorecard,
    Commentary,
    HistoricalCommentary,
    Overs,
}

impl SubResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubResourceKind::Scorecard => "scorecard",
            SubResourceKind::HistoricalScorecard => "historical_scorecard",
            SubResourceKind::Commentary => "commentary",
            SubResourceKind::HistoricalCommentary => "historical_commentary",
            SubResourceKind::Overs => "overs",
        }
    }
}

// API response for match listings
#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchRecord>,
    pub count: usize,
    pub last_updated: BsonDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(CanonicalStatus::Completed.is_terminal());
        assert!(CanonicalStatus::Abandoned.is_terminal());
        assert!(CanonicalStatus::Cancelled.is_terminal());
        assert!(!CanonicalStatus::Live.is_terminal());
        assert!(!CanonicalStatus::Upcoming.is_terminal());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            CanonicalStatus::Upcoming,
            CanonicalStatus::Live,
            CanonicalStatus::Completed,
            CanonicalStatus::Abandoned,
            CanonicalStatus::Cancelled,
        ] {
            assert_eq!(CanonicalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CanonicalStatus::parse("Finished"), None);
    }

    #[test]
    fn format_from_provider_spellings() {
        assert_eq!(MatchFormat::from_provider("T20I"), MatchFormat::T20);
        assert_eq!(MatchFormat::from_provider("odi"), MatchFormat::Odi);
        assert_eq!(MatchFormat::from_provider("TEST"), MatchFormat::Test);
        assert_eq!(MatchFormat::from_provider("The Hundred"), MatchFormat::Hundred);
        assert_eq!(MatchFormat::from_provider("exhibition"), MatchFormat::Other);
    }

    #[test]
    fn zero_scoreline_detection() {
        let zero = ScoreLine::default();
        assert!(zero.is_zero());

        let scored = ScoreLine {
            runs: 1,
            ..ScoreLine::default()
        };
        assert!(scored.has_data());
    }
}
