//! Score extractor: pull a team's score out of whichever payload shape the
//! provider happened to use. Four known shapes are tried in priority
//! order; the first attempt yielding any non-zero numeric field wins.
//! Parsing never fails - missing or malformed fields degrade to zero.

use serde_json::Value;

use crate::models::match_record::ScoreLine;
use crate::provider::shapes::{get_f64, get_i64};

/// Which side of the match to extract. team1 reads innings 0 /
/// `team1Score`; team2 reads innings 1 / `team2Score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSlot {
    Team1,
    Team2,
}

impl TeamSlot {
    pub fn index(&self) -> usize {
        match self {
            TeamSlot::Team1 => 0,
            TeamSlot::Team2 => 1,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TeamSlot::Team1 => "team1",
            TeamSlot::Team2 => "team2",
        }
    }
}

const RUNS_ALIASES: &[&str] = &["totalRuns", "totalruns", "runs", "score"];
const WICKETS_ALIASES: &[&str] = &["totalWickets", "totalwickets", "wickets", "wkts"];
const OVERS_ALIASES: &[&str] = &["totalOvers", "totalovers", "overs"];
const BALLS_ALIASES: &[&str] = &["balls"];
const RUN_RATE_ALIASES: &[&str] = &["runRate", "runrate", "rpo"];
const REQ_RUN_RATE_ALIASES: &[&str] = &["requiredRunRate", "reqRunRate", "rrr"];

/// Extract one team's score from an arbitrary provider payload. Always
/// returns a value; an all-zero `ScoreLine` means no score data was found.
pub fn extract_team_score(payload: &Value, slot: TeamSlot) -> ScoreLine {
    let attempts = [
        from_scorecard,
        from_match_score,
        from_flat_fields,
        from_short_score,
    ];

    for attempt in attempts {
        if let Some(score) = attempt(payload, slot) {
            if score.has_data() {
                return score;
            }
        }
    }

    ScoreLine::default()
}

/// Shape 1: scorecard payload with an ordered list of per-innings records.
/// team1 → innings 0, team2 → innings 1. Field names vary per endpoint
/// generation, hence the alias lists; some generations nest the numbers
/// under `scoreDetails`.
fn from_scorecard(payload: &Value, slot: TeamSlot) -> Option<ScoreLine> {
    let innings_list = payload
        .get("scorecard")
        .or_else(|| payload.get("scoreCard"))
        .and_then(Value::as_array)?;

    let innings = innings_list.get(slot.index())?;
    let details = innings.get("scoreDetails").unwrap_or(innings);

    let mut score = read_score_fields(details);
    if score.run_rate == 0.0 {
        score.run_rate = computed_run_rate(score.runs, score.overs);
    }
    Some(score)
}

/// Shape 2: live match-score payload keyed `team1Score`/`team1`, holding
/// per-innings sub-objects named like `inngs1`/`inning2`. Runs, overs and
/// balls accumulate across innings; wickets do not - a team's wicket count
/// is the max observed in any one innings.
fn from_match_score(payload: &Value, slot: TeamSlot) -> Option<ScoreLine> {
    let container = payload.get("matchScore").unwrap_or(payload);
    let team_obj = container
        .get(format!("{}Score", slot.key()))
        .or_else(|| container.get(slot.key()))?
        .as_object()?;

    let mut runs = 0i64;
    let mut wickets = 0i64;
    let mut overs = 0f64;
    let mut balls = 0i64;
    let mut explicit_rr: Option<f64> = None;
    let mut explicit_rrr: Option<f64> = None;
    let mut seen_innings = false;

    for (key, innings) in team_obj {
        let lowered = key.to_lowercase();
        if !lowered.starts_with("inngs") && !lowered.starts_with("inning") {
            continue;
        }
        seen_innings = true;

        runs += get_i64(innings, RUNS_ALIASES).unwrap_or(0);
        wickets = wickets.max(get_i64(innings, WICKETS_ALIASES).unwrap_or(0));
        overs += get_f64(innings, OVERS_ALIASES).unwrap_or(0.0);
        balls += get_i64(innings, BALLS_ALIASES).unwrap_or(0);

        if let Some(rr) = get_f64(innings, RUN_RATE_ALIASES) {
            explicit_rr = Some(rr);
        }
        if let Some(rrr) = get_f64(innings, REQ_RUN_RATE_ALIASES) {
            explicit_rrr = Some(rrr);
        }
    }

    if !seen_innings {
        return None;
    }

    Some(ScoreLine {
        runs,
        wickets,
        overs,
        balls,
        run_rate: explicit_rr.unwrap_or_else(|| computed_run_rate(runs, overs)),
        required_run_rate: explicit_rrr.unwrap_or(0.0),
    })
}

/// Shape 3: abbreviated flat fields directly on the match payload,
/// e.g. `"t1s": "186/4 (20)"`.
fn from_flat_fields(payload: &Value, slot: TeamSlot) -> Option<ScoreLine> {
    let field = match slot {
        TeamSlot::Team1 => "t1s",
        TeamSlot::Team2 => "t2s",
    };

    let text = payload
        .get(field)
        .or_else(|| payload.get("matchInfo").and_then(|i| i.get(field)))
        .and_then(Value::as_str)?;

    parse_abbreviated_score(text)
}

/// Shape 4: `matchInfo.score` object with one-letter field names,
/// optionally split per team.
fn from_short_score(payload: &Value, slot: TeamSlot) -> Option<ScoreLine> {
    let score_obj = payload.get("matchInfo").and_then(|i| i.get("score"))?;
    let per_team = score_obj.get(slot.key()).unwrap_or(score_obj);

    let runs = get_i64(per_team, &["r"]).unwrap_or(0);
    let wickets = get_i64(per_team, &["w"]).unwrap_or(0);
    let overs = get_f64(per_team, &["o"]).unwrap_or(0.0);
    let balls = get_i64(per_team, &["b"]).unwrap_or(0);
    let run_rate = get_f64(per_team, &["rr"]).unwrap_or_else(|| computed_run_rate(runs, overs));
    let required_run_rate = get_f64(per_team, &["rrr"]).unwrap_or(0.0);

    Some(ScoreLine {
        runs,
        wickets,
        overs,
        balls,
        run_rate,
        required_run_rate,
    })
}

fn read_score_fields(v: &Value) -> ScoreLine {
    let runs = get_i64(v, RUNS_ALIASES).unwrap_or(0);
    let overs = get_f64(v, OVERS_ALIASES).unwrap_or(0.0);
    ScoreLine {
        runs,
        wickets: get_i64(v, WICKETS_ALIASES).unwrap_or(0),
        overs,
        balls: get_i64(v, BALLS_ALIASES).unwrap_or(0),
        run_rate: get_f64(v, RUN_RATE_ALIASES).unwrap_or(0.0),
        required_run_rate: get_f64(v, REQ_RUN_RATE_ALIASES).unwrap_or(0.0),
    }
}

/// "186/4 (20)" → runs 186, wickets 4, overs 20. "95" → runs 95. Anything
/// unparseable yields None.
fn parse_abbreviated_score(text: &str) -> Option<ScoreLine> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (score_part, overs_part) = match text.split_once('(') {
        Some((s, o)) => (s.trim(), Some(o.trim_end_matches(')').trim())),
        None => (text, None),
    };

    let (runs_str, wickets_str) = match score_part.split_once('/') {
        Some((r, w)) => (r.trim(), Some(w.trim())),
        None => (score_part, None),
    };

    let runs = runs_str.parse::<i64>().ok()?;
    let wickets = wickets_str.and_then(|w| w.parse::<i64>().ok()).unwrap_or(0);
    let overs = overs_part
        .and_then(|o| o.parse::<f64>().ok())
        .unwrap_or(0.0);

    Some(ScoreLine {
        runs,
        wickets,
        overs,
        balls: 0,
        run_rate: computed_run_rate(runs, overs),
        required_run_rate: 0.0,
    })
}

/// runs/overs rounded to 2 decimals; 0 when no overs bowled.
fn computed_run_rate(runs: i64, overs: f64) -> f64 {
    if overs > 0.0 {
        ((runs as f64 / overs) * 100.0).round() / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scorecard_shape_picks_innings_by_slot() {
        let payload = json!({
            "scoreCard": [
                { "scoreDetails": { "runs": 350, "wickets": 7, "overs": 89.4, "runRate": 3.9 } },
                { "scoreDetails": { "runs": 120, "wickets": 4, "overs": 40.0 } }
            ]
        });

        let t1 = extract_team_score(&payload, TeamSlot::Team1);
        assert_eq!(t1.runs, 350);
        assert_eq!(t1.wickets, 7);
        assert_eq!(t1.run_rate, 3.9);

        let t2 = extract_team_score(&payload, TeamSlot::Team2);
        assert_eq!(t2.runs, 120);
        // No explicit run rate on the second innings: recomputed.
        assert_eq!(t2.run_rate, 3.0);
    }

    #[test]
    fn scorecard_field_aliases() {
        let payload = json!({
            "scorecard": [
                { "totalruns": 186, "wkts": 4, "totalovers": 20 }
            ]
        });
        let t1 = extract_team_score(&payload, TeamSlot::Team1);
        assert_eq!(t1.runs, 186);
        assert_eq!(t1.wickets, 4);
        assert_eq!(t1.overs, 20.0);
    }

    #[test]
    fn match_score_sums_runs_but_takes_max_wickets() {
        // Two-innings match: runs accumulate, wickets do not.
        let payload = json!({
            "matchScore": {
                "team1Score": {
                    "inngs1": { "runs": 120, "wickets": 10, "overs": 45.0 },
                    "inngs2": { "runs": 45, "wickets": 3, "overs": 12.0 }
                }
            }
        });

        let score = extract_team_score(&payload, TeamSlot::Team1);
        assert_eq!(score.runs, 165);
        assert_eq!(score.wickets, 10);
        assert_eq!(score.overs, 57.0);
        // 165 / 57 = 2.894... → 2.89
        assert_eq!(score.run_rate, 2.89);
    }

    #[test]
    fn match_score_accepts_inning_key_spelling_and_bare_container() {
        let payload = json!({
            "team2Score": {
                "inning1": { "runs": 201, "wickets": 6, "overs": 20 }
            }
        });
        let score = extract_team_score(&payload, TeamSlot::Team2);
        assert_eq!(score.runs, 201);
        assert_eq!(score.wickets, 6);
    }

    #[test]
    fn explicit_run_rate_wins_over_recomputation() {
        let payload = json!({
            "matchScore": {
                "team1Score": {
                    "inngs1": { "runs": 100, "overs": 10, "runRate": 9.87, "rrr": 11.2 }
                }
            }
        });
        let score = extract_team_score(&payload, TeamSlot::Team1);
        assert_eq!(score.run_rate, 9.87);
        assert_eq!(score.required_run_rate, 11.2);
    }

    #[test]
    fn flat_abbreviated_fields_parse() {
        let payload = json!({ "t1s": "186/4 (20)", "t2s": "95" });

        let t1 = extract_team_score(&payload, TeamSlot::Team1);
        assert_eq!(t1.runs, 186);
        assert_eq!(t1.wickets, 4);
        assert_eq!(t1.overs, 20.0);
        assert_eq!(t1.run_rate, 9.3);

        let t2 = extract_team_score(&payload, TeamSlot::Team2);
        assert_eq!(t2.runs, 95);
        assert_eq!(t2.wickets, 0);
    }

    #[test]
    fn short_score_object_with_per_team_split() {
        let payload = json!({
            "matchInfo": {
                "score": {
                    "team2": { "r": 45, "w": 2, "o": 6.0, "rr": 7.5, "rrr": 9.1 }
                }
            }
        });
        let score = extract_team_score(&payload, TeamSlot::Team2);
        assert_eq!(score.runs, 45);
        assert_eq!(score.required_run_rate, 9.1);
    }

    #[test]
    fn unknown_shapes_degrade_to_zero() {
        for payload in [
            json!({}),
            json!(null),
            json!({ "scoreCard": "not an array" }),
            json!({ "matchScore": { "team1Score": { "unrelated": 5 } } }),
            json!({ "t1s": "rained off" }),
        ] {
            let score = extract_team_score(&payload, TeamSlot::Team1);
            assert!(score.is_zero(), "expected zero score for {}", payload);
        }
    }

    #[test]
    fn higher_priority_shape_wins_when_both_present() {
        // Scorecard shape outranks the flat fallback.
        let payload = json!({
            "scoreCard": [ { "runs": 300, "wickets": 5, "overs": 50 } ],
            "t1s": "10/1 (2)"
        });
        assert_eq!(extract_team_score(&payload, TeamSlot::Team1).runs, 300);
    }

    #[test]
    fn extraction_is_pure_and_idempotent() {
        let payload = json!({
            "matchScore": {
                "team1Score": {
                    "inngs1": { "runs": 166, "wickets": 4, "overs": 17.2 }
                }
            }
        });
        let first = extract_team_score(&payload, TeamSlot::Team1);
        let second = extract_team_score(&payload, TeamSlot::Team1);
        assert_eq!(first, second);
    }
}
