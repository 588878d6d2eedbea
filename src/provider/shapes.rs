//! Tolerant readers for the provider's wire shapes.
//!
//! The provider wraps list responses in several layers of nesting
//! (`typeMatches` → `seriesMatches` → `seriesAdWrapper` → `matches`) and is
//! inconsistent about numeric types: ids and epoch timestamps arrive as
//! numbers on some endpoints and as strings on others. Everything here
//! degrades to `None`/empty instead of failing.

use serde_json::Value;

use crate::models::match_record::{MatchFormat, SeriesInfo, Venue};

/// One match entry as flattened out of a provider list response. `raw`
/// keeps the whole match object (matchInfo + matchScore) for the score
/// extractor and for the cache's diagnostic snapshot.
#[derive(Debug, Clone)]
pub struct ProviderMatch {
    pub match_id: String,
    pub title: String,
    pub short_title: String,
    pub sub_title: String,
    pub format: MatchFormat,
    pub state: Option<String>,
    pub status_text: Option<String>,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub venue: Venue,
    pub series: SeriesInfo,
    /// (teamId, teamName, teamShortName) for team1 and team2, when known.
    pub team1: Option<(String, String, String)>,
    pub team2: Option<(String, String, String)>,
    pub raw: Value,
}

/// Read a string field, accepting actual strings and numbers.
pub fn get_str(v: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match v.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Read an integer field, accepting numbers and numeric strings.
pub fn get_i64(v: &Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        match v.get(key) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Some(i);
                }
                if let Some(f) = n.as_f64() {
                    return Some(f as i64);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(i) = s.trim().parse::<i64>() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Read a float field, accepting numbers and numeric strings.
pub fn get_f64(v: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match v.get(key) {
            Some(Value::Number(n)) => {
                if let Some(f) = n.as_f64() {
                    return Some(f);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(f) = s.trim().parse::<f64>() {
                    return Some(f);
                }
            }
            _ => {}
        }
    }
    None
}

/// Flatten a provider list response (live/recent/upcoming) into match
/// entries. Ad wrappers and malformed layers are skipped silently.
pub fn flatten_list(payload: &Value) -> Vec<ProviderMatch> {
    let mut out = Vec::new();

    let type_matches = match payload.get("typeMatches").and_then(Value::as_array) {
        Some(arr) => arr,
        None => return out,
    };

    for type_match in type_matches {
        let series_matches = match type_match.get("seriesMatches").and_then(Value::as_array) {
            Some(arr) => arr,
            None => continue,
        };

        for series_match in series_matches {
            // Entries without a seriesAdWrapper are ad slots.
            let wrapper = match series_match.get("seriesAdWrapper") {
                Some(w) => w,
                None => continue,
            };

            let matches = match wrapper.get("matches").and_then(Value::as_array) {
                Some(arr) => arr,
                None => continue,
            };

            for entry in matches {
                if let Some(pm) = parse_match_entry(entry) {
                    out.push(pm);
                }
            }
        }
    }

    out
}

/// Parse a single match object (list entry or `/mcenter` detail response).
/// Returns `None` only when no match id can be found at all.
pub fn parse_match_entry(entry: &Value) -> Option<ProviderMatch> {
    let info = entry.get("matchInfo").unwrap_or(entry);

    let match_id = get_str(info, &["matchId", "id"])?;

    let team1 = info.get("team1").and_then(parse_team_ref);
    let team2 = info.get("team2").and_then(parse_team_ref);

    let match_desc = get_str(info, &["matchDesc", "matchDescription"]).unwrap_or_default();

    // "India vs England, 3rd T20I" when both teams are known, otherwise
    // fall back to whatever description the provider gave.
    let title = match (&team1, &team2) {
        (Some(t1), Some(t2)) if !match_desc.is_empty() => {
            format!("{} vs {}, {}", t1.1, t2.1, match_desc)
        }
        (Some(t1), Some(t2)) => format!("{} vs {}", t1.1, t2.1),
        _ => match_desc.clone(),
    };
    let short_title = match (&team1, &team2) {
        (Some(t1), Some(t2)) => format!("{} vs {}", t1.2, t2.2),
        _ => title.clone(),
    };

    let venue = info
        .get("venueInfo")
        .map(|vi| Venue {
            name: get_str(vi, &["ground", "name"]).unwrap_or_default(),
            city: get_str(vi, &["city"]).unwrap_or_default(),
            country: get_str(vi, &["country"]).unwrap_or_default(),
        })
        .unwrap_or_default();

    let series = SeriesInfo {
        id: get_str(info, &["seriesId"]).unwrap_or_default(),
        name: get_str(info, &["seriesName"]).unwrap_or_default(),
        series_type: get_str(info, &["matchType", "seriesType"]).unwrap_or_default(),
    };

    let format = get_str(info, &["matchFormat", "matchType"])
        .map(|f| MatchFormat::from_provider(&f))
        .unwrap_or_default();

    Some(ProviderMatch {
        match_id,
        title,
        short_title,
        sub_title: match_desc,
        format,
        state: get_str(info, &["state"]),
        status_text: get_str(info, &["status"]),
        start_ms: get_i64(info, &["startDate", "startDt", "matchStartTimestamp"]),
        end_ms: get_i64(info, &["endDate", "endDt", "matchEndTimestamp"]),
        venue,
        series,
        team1,
        team2,
        raw: entry.clone(),
    })
}

fn parse_team_ref(team: &Value) -> Option<(String, String, String)> {
    let id = get_str(team, &["teamId", "id"]).unwrap_or_default();
    let name = get_str(team, &["teamName", "name"])?;
    let short = get_str(team, &["teamSName", "shortName"]).unwrap_or_else(|| name.clone());
    Some((id, name, short))
}
