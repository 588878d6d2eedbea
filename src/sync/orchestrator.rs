//! Sync orchestrator: the top-level flow behind every match read. Checks
//! staleness, fetches from the provider when needed (sub-resources fanned
//! out concurrently), runs classification / extraction / liveness /
//! dedupe, and hands candidates to the merge engine. Reads degrade to
//! cache on rate limits, partial failures and missing provider
//! credentials - a hard error surfaces only when there is nothing at all
//! to serve.

use std::sync::Arc;

use bson::DateTime as BsonDateTime;
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::errors::{AppError, Result};
use crate::models::match_record::{
    CanonicalStatus, MatchRecord, SubResourceBlob, SubResourceKind, TeamScore,
};
use crate::provider::client::{CricketDataClient, ListCategory, ProviderError};
use crate::provider::shapes::{flatten_list, parse_match_entry, ProviderMatch};
use crate::store::{MatchFilter, MatchSort, MatchStore, StoreError};
use crate::sync::classifier::classify;
use crate::sync::dedupe::dedupe;
use crate::sync::liveness::apply_liveness_override;
use crate::sync::merge::MergeEngine;
use crate::sync::score::{extract_team_score, TeamSlot};
use crate::sync::staleness::is_stale;

pub struct MatchSyncService {
    store: Arc<dyn MatchStore>,
    engine: MergeEngine,
    provider: Option<Arc<CricketDataClient>>,
}

impl MatchSyncService {
    pub fn new(store: Arc<dyn MatchStore>, provider: Option<Arc<CricketDataClient>>) -> Self {
        MatchSyncService {
            engine: MergeEngine::new(store.clone()),
            store,
            provider,
        }
    }

    /// Serve a match list, refreshing from the provider first when the
    /// cached view is stale. Returns the (possibly stale) cache on any
    /// provider trouble.
    pub async fn sync_list(&self, category: ListCategory) -> Result<Vec<MatchRecord>> {
        let now = Utc::now();
        let cached = self.cached_list(category).await?;

        let provider = match &self.provider {
            Some(p) => p,
            None => {
                debug!("provider not configured, serving {} list from cache", category.as_str());
                return Ok(cached);
            }
        };

        let list_is_fresh = !cached.is_empty() && cached.iter().all(|r| !is_stale(r, now));
        if list_is_fresh {
            return Ok(cached);
        }

        let payload = match provider.fetch_match_list(category).await {
            Ok(p) => p,
            Err(ProviderError::RateLimited) => {
                warn!("rate limited on {} list, serving cache", category.as_str());
                return Ok(cached);
            }
            Err(e) => {
                warn!("{} list fetch failed ({}), serving cache", category.as_str(), e);
                return Ok(cached);
            }
        };

        let entries = dedupe(flatten_list(&payload));
        info!("syncing {} matches from {} list", entries.len(), category.as_str());

        for entry in &entries {
            let candidate = build_candidate(entry, default_status_for(category), now);
            if let Err(e) = self.engine.persist(candidate).await {
                // One bad match must not poison the rest of the batch.
                warn!("failed to persist match {}: {}", entry.match_id, e);
            }
        }

        self.cached_list(category).await
    }

    /// Serve one match, refreshing it (and any requested sub-resources)
    /// when stale or missing. `resources` lists the sub-resource blobs the
    /// caller needs attached.
    pub async fn sync_match_detail(
        &self,
        match_id: &str,
        resources: &[SubResourceKind],
    ) -> Result<MatchRecord> {
        let now = Utc::now();
        let cached = self.store.find_by_match_id(match_id).await.map_err(store_err)?;

        let missing_resource = cached
            .as_ref()
            .map(|r| resources.iter().any(|kind| blob_of(r, *kind).is_none()))
            .unwrap_or(true);
        let needs_refresh = match &cached {
            Some(record) => is_stale(record, now) || missing_resource,
            None => true,
        };

        let provider = match &self.provider {
            Some(p) => p,
            None => return cached.ok_or_else(|| AppError::MatchNotFound(match_id.to_string())),
        };

        if !needs_refresh {
            // Unwrap is safe: needs_refresh is true whenever cached is None.
            return Ok(cached.expect("fresh record"));
        }

        let (info_result, sub_results) = self.fetch_detail(provider, match_id, resources).await;

        let info_entry = match info_result {
            Ok(payload) => parse_match_entry(&payload),
            Err(ProviderError::RateLimited) => {
                warn!("rate limited on match {}, serving cache", match_id);
                return cached.ok_or_else(|| AppError::MatchNotFound(match_id.to_string()));
            }
            Err(e) => {
                debug!("match info fetch failed for {}: {}", match_id, e);
                None
            }
        };

        // Build the candidate from fresh info when we got it, otherwise
        // from the cached record so sub-resource updates still land.
        let mut candidate = match (&info_entry, &cached) {
            (Some(entry), _) => build_candidate(entry, CanonicalStatus::Upcoming, now),
            (None, Some(record)) => record.clone(),
            (None, None) => {
                return Err(AppError::MatchNotFound(match_id.to_string()));
            }
        };

        let mut fetched_any = info_entry.is_some();
        for (kind, result) in sub_results {
            match result {
                Ok(payload) => {
                    fetched_any = true;
                    set_blob(
                        &mut candidate,
                        kind,
                        SubResourceBlob {
                            data: payload,
                            last_updated: BsonDateTime::from_chrono(now),
                        },
                    );
                }
                Err(ProviderError::NotAvailable(code)) => {
                    // Pre-match scorecard, commentary before the toss, etc.
                    debug!("{} for {} not yet available (HTTP {})", kind.as_str(), match_id, code);
                }
                Err(e) => {
                    warn!("{} fetch failed for {}: {}", kind.as_str(), match_id, e);
                }
            }
        }

        if !fetched_any {
            // Nothing fetched at all: fall through to whatever we had.
            return cached.ok_or_else(|| AppError::MatchNotFound(match_id.to_string()));
        }

        match self.engine.persist(candidate).await {
            Ok(stored) => Ok(stored),
            Err(StoreError::VersionConflict(id)) => {
                // Retries exhausted. The read can still answer from the
                // pre-merge cache; the conflict is the caller's signal
                // only when there is no cache at all.
                warn!("persist conflict for match {} after retries", id);
                match cached {
                    Some(record) => Ok(record),
                    None => Err(AppError::PersistenceFailure(format!(
                        "persistent version conflict on match {}",
                        id
                    ))),
                }
            }
            Err(e) => Err(store_err(e)),
        }
    }

    /// Administrative status override - the only path that may change a
    /// terminal status.
    pub async fn override_status(
        &self,
        match_id: &str,
        status: CanonicalStatus,
    ) -> Result<MatchRecord> {
        let mut record = self
            .store
            .find_by_match_id(match_id)
            .await
            .map_err(store_err)?
            .ok_or_else(|| AppError::MatchNotFound(match_id.to_string()))?;

        info!("admin override: match {} -> {:?}", match_id, status);
        record.status = status;
        record.sync_is_live();

        self.engine
            .persist_with_override(record)
            .await
            .map_err(store_err)
    }

    /// Administrative purge - normal operation never deletes records.
    pub async fn purge(&self, match_id: &str) -> Result<bool> {
        self.store.purge(match_id).await.map_err(store_err)
    }

    async fn cached_list(&self, category: ListCategory) -> Result<Vec<MatchRecord>> {
        let filter = MatchFilter {
            statuses: list_statuses(category).to_vec(),
            ..MatchFilter::default()
        };
        let sort = match category {
            ListCategory::Live => MatchSort::PriorityThenRecent,
            ListCategory::Upcoming => MatchSort::StartDateAsc,
            ListCategory::Recent => MatchSort::UpdatedDesc,
        };
        self.store
            .find_matches(&filter, sort, None)
            .await
            .map_err(store_err)
    }

    /// Fan out the info fetch and every requested sub-resource fetch
    /// concurrently; await them all. Failures stay per-resource.
    async fn fetch_detail(
        &self,
        provider: &Arc<CricketDataClient>,
        match_id: &str,
        resources: &[SubResourceKind],
    ) -> (
        std::result::Result<serde_json::Value, ProviderError>,
        Vec<(SubResourceKind, std::result::Result<serde_json::Value, ProviderError>)>,
    ) {
        let info_fut = provider.fetch_match_info(match_id);

        let sub_futs = resources.iter().map(|kind| {
            let provider = provider.clone();
            let kind = *kind;
            let match_id = match_id.to_string();
            async move {
                let result = match kind {
                    SubResourceKind::Scorecard => provider.fetch_scorecard(&match_id).await,
                    SubResourceKind::HistoricalScorecard => {
                        provider.fetch_historical_scorecard(&match_id).await
                    }
                    SubResourceKind::Commentary => provider.fetch_commentary(&match_id).await,
                    SubResourceKind::HistoricalCommentary => {
                        provider.fetch_historical_commentary(&match_id).await
                    }
                    SubResourceKind::Overs => provider.fetch_overs(&match_id).await,
                };
                (kind, result)
            }
        });

        let (info_result, sub_results) = futures::join!(info_fut, join_all(sub_futs));
        (info_result, sub_results)
    }
}

/// The live list inverts the classifier fallback: no recognizable pattern
/// in a live feed means the match is still in progress.
fn default_status_for(category: ListCategory) -> CanonicalStatus {
    match category {
        ListCategory::Live => CanonicalStatus::Live,
        _ => CanonicalStatus::Upcoming,
    }
}

fn list_statuses(category: ListCategory) -> &'static [CanonicalStatus] {
    match category {
        ListCategory::Live => &[CanonicalStatus::Live],
        ListCategory::Upcoming => &[CanonicalStatus::Upcoming],
        ListCategory::Recent => &[
            CanonicalStatus::Completed,
            CanonicalStatus::Abandoned,
            CanonicalStatus::Cancelled,
        ],
    }
}

/// Listing relevance: live first, then upcoming, then finished.
fn priority_for(status: CanonicalStatus) -> i64 {
    match status {
        CanonicalStatus::Live => 100,
        CanonicalStatus::Upcoming => 50,
        _ => 10,
    }
}

/// Build a candidate cache record from one provider match entry: classify
/// the status text, apply the liveness override, extract both team scores.
pub(crate) fn build_candidate(
    entry: &ProviderMatch,
    default_status: CanonicalStatus,
    now: DateTime<Utc>,
) -> MatchRecord {
    let start_date = entry
        .start_ms
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or(now);

    let classified = classify(entry.status_text.as_deref(), default_status);
    let status = apply_liveness_override(classified, start_date, now);

    let mut record = MatchRecord::new(&entry.match_id, BsonDateTime::from_chrono(start_date));
    record.status = status;
    record.title = entry.title.clone();
    record.short_title = entry.short_title.clone();
    record.sub_title = entry.sub_title.clone();
    record.format = entry.format;
    record.venue = entry.venue.clone();
    record.series = entry.series.clone();
    record.priority = priority_for(status);
    record.raw = Some(entry.raw.clone());

    // End date only once the match has actually concluded - a scheduled
    // end timestamp on an unfinished match stays out of the record.
    if status.is_terminal() {
        record.end_date = entry
            .end_ms
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(BsonDateTime::from_chrono);
    }

    // 0-or-2 teams, never 1: a half-known pairing stores no teams.
    if let (Some(t1), Some(t2)) = (&entry.team1, &entry.team2) {
        record.teams = vec![
            team_score(t1, &entry.raw, TeamSlot::Team1),
            team_score(t2, &entry.raw, TeamSlot::Team2),
        ];
    }

    record.sync_is_live();
    record
}

fn team_score(
    team: &(String, String, String),
    raw: &serde_json::Value,
    slot: TeamSlot,
) -> TeamScore {
    TeamScore {
        team_id: team.0.clone(),
        team_name: team.1.clone(),
        team_short_name: team.2.clone(),
        score: extract_team_score(raw, slot),
    }
}

fn blob_of(record: &MatchRecord, kind: SubResourceKind) -> Option<&SubResourceBlob> {
    match kind {
        SubResourceKind::Scorecard => record.scorecard.as_ref(),
        SubResourceKind::HistoricalScorecard => record.historical_scorecard.as_ref(),
        SubResourceKind::Commentary => record.commentary.as_ref(),
        SubResourceKind::HistoricalCommentary => record.historical_commentary.as_ref(),
        SubResourceKind::Overs => record.overs.as_ref(),
    }
}

fn set_blob(record: &mut MatchRecord, kind: SubResourceKind, blob: SubResourceBlob) {
    match kind {
        SubResourceKind::Scorecard => record.scorecard = Some(blob),
        SubResourceKind::HistoricalScorecard => record.historical_scorecard = Some(blob),
        SubResourceKind::Commentary => record.commentary = Some(blob),
        SubResourceKind::HistoricalCommentary => record.historical_commentary = Some(blob),
        SubResourceKind::Overs => record.overs = Some(blob),
    }
}

fn store_err(e: StoreError) -> AppError {
    match e {
        StoreError::VersionConflict(id) => {
            AppError::PersistenceFailure(format!("version conflict on match {}", id))
        }
        StoreError::Database(msg) => AppError::PersistenceFailure(msg),
        StoreError::Serialization(msg) => AppError::PersistenceFailure(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    use crate::store::memory::MemoryMatchStore;

    fn service_with(
        server: Option<&mockito::ServerGuard>,
    ) -> (Arc<MemoryMatchStore>, MatchSyncService) {
        let store = Arc::new(MemoryMatchStore::new());
        let provider = server.map(|s| {
            Arc::new(
                CricketDataClient::new("test-key".into(), "example.test".into())
                    .with_base_url(s.url()),
            )
        });
        let service = MatchSyncService::new(store.clone(), provider);
        (store, service)
    }

    fn list_payload(match_id: u64, status: &str, start_ms: i64, end_ms: i64) -> serde_json::Value {
        json!({
            "typeMatches": [{
                "matchType": "International",
                "seriesMatches": [{
                    "seriesAdWrapper": {
                        "seriesId": 1,
                        "seriesName": "Test Series",
                        "matches": [ match_entry(match_id, status, start_ms, end_ms) ]
                    }
                }]
            }]
        })
    }

    fn match_entry(match_id: u64, status: &str, start_ms: i64, end_ms: i64) -> serde_json::Value {
        json!({
            "matchInfo": {
                "matchId": match_id,
                "seriesId": 1,
                "seriesName": "Test Series",
                "matchDesc": "3rd T20I",
                "matchFormat": "T20",
                "startDate": start_ms.to_string(),
                "endDate": end_ms.to_string(),
                "state": "Preview",
                "status": status,
                "team1": { "teamId": 2, "teamName": "India", "teamSName": "IND" },
                "team2": { "teamId": 9, "teamName": "England", "teamSName": "ENG" }
            },
            "matchScore": {
                "team1Score": { "inngs1": { "runs": 166, "wickets": 4, "overs": 17.2 } },
                "team2Score": { "inngs1": { "runs": 160, "wickets": 8, "overs": 20 } }
            }
        })
    }

    fn age_record(store: &MemoryMatchStore, match_id: &str, hours: i64) {
        // Backdate updated_at to force staleness on the next read.
        let mut record = store.get(match_id).unwrap();
        let aged = Utc::now() - Duration::hours(hours);
        record.updated_at = Some(BsonDateTime::from_chrono(aged));
        store.insert_raw(record);
    }

    #[tokio::test]
    async fn cache_only_mode_serves_cache_and_never_fetches() {
        let (store, service) = service_with(None);

        let err = service.sync_match_detail("41881", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::MatchNotFound(_)));

        let mut record = MatchRecord::new("41881", BsonDateTime::now());
        record.status = CanonicalStatus::Live;
        record.sync_is_live();
        store.insert_raw(record);

        let served = service.sync_match_detail("41881", &[]).await.unwrap();
        assert_eq!(served.match_id, "41881");
    }

    #[tokio::test]
    async fn list_sync_populates_cache_then_serves_fresh_reads_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let now_ms = Utc::now().timestamp_millis();
        let mock = server
            .mock("GET", "/matches/v1/live")
            .with_status(200)
            .with_body(list_payload(89654, "Live", now_ms - 3_600_000, now_ms + 3_600_000).to_string())
            .expect(1)
            .create_async()
            .await;

        let (store, service) = service_with(Some(&server));

        let first = service.sync_list(ListCategory::Live).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].status, CanonicalStatus::Live);
        assert_eq!(first[0].teams.len(), 2);
        assert_eq!(first[0].teams[0].score.runs, 166);
        assert_eq!(store.len(), 1);

        // Second read within the 30s live tier: cache only, one provider hit total.
        let second = service.sync_list(ListCategory::Live).await.unwrap();
        assert_eq!(second.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn live_list_defaults_unknown_status_to_live() {
        let mut server = mockito::Server::new_async().await;
        let now_ms = Utc::now().timestamp_millis();
        // A status string matching no pattern group at all.
        server
            .mock("GET", "/matches/v1/live")
            .with_status(200)
            .with_body(
                list_payload(777, "something inexplicable", now_ms + 86_400_000, 0).to_string(),
            )
            .create_async()
            .await;

        let (_store, service) = service_with(Some(&server));
        let matches = service.sync_list(ListCategory::Live).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].status, CanonicalStatus::Live);
        assert!(matches[0].is_live);
    }

    #[tokio::test]
    async fn rate_limited_list_serves_stale_cache() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/matches/v1/live")
            .with_status(429)
            .create_async()
            .await;

        let (store, service) = service_with(Some(&server));

        let mut record = MatchRecord::new("41881", BsonDateTime::now());
        record.status = CanonicalStatus::Live;
        record.sync_is_live();
        store.insert_raw(record);
        age_record(&store, "41881", 2);

        let served = service.sync_list(ListCategory::Live).await.unwrap();
        assert_eq!(served.len(), 1, "stale cache must still be served on 429");
    }

    #[tokio::test]
    async fn partial_subresource_failure_persists_what_succeeded() {
        let mut server = mockito::Server::new_async().await;
        let now_ms = Utc::now().timestamp_millis();

        server
            .mock("GET", "/mcenter/v1/89654")
            .with_status(200)
            .with_body(match_entry(89654, "Live", now_ms - 3_600_000, 0).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/mcenter/v1/89654/scard")
            .with_status(200)
            .with_body(json!({ "scoreCard": [ { "runs": 166 } ] }).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/mcenter/v1/89654/comm")
            .with_status(500)
            .create_async()
            .await;

        let (_store, service) = service_with(Some(&server));
        let record = service
            .sync_match_detail(
                "89654",
                &[SubResourceKind::Scorecard, SubResourceKind::Commentary],
            )
            .await
            .unwrap();

        assert!(record.scorecard.is_some(), "fetched blob must be attached");
        assert!(record.commentary.is_none(), "failed blob stays absent");
        assert_eq!(record.status, CanonicalStatus::Live);
    }

    #[tokio::test]
    async fn missing_subresource_is_not_an_error_before_the_match() {
        let mut server = mockito::Server::new_async().await;
        let now_ms = Utc::now().timestamp_millis();

        server
            .mock("GET", "/mcenter/v1/555")
            .with_status(200)
            .with_body(
                match_entry(555, "Match starts at 14:00 GMT", now_ms + 600_000, 0).to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/mcenter/v1/555/scard")
            .with_status(404)
            .create_async()
            .await;

        let (_store, service) = service_with(Some(&server));
        let record = service
            .sync_match_detail("555", &[SubResourceKind::Scorecard])
            .await
            .unwrap();

        assert_eq!(record.status, CanonicalStatus::Upcoming);
        assert!(record.scorecard.is_none());
    }

    #[tokio::test]
    async fn subresources_survive_across_refreshes() {
        let mut server = mockito::Server::new_async().await;
        let now_ms = Utc::now().timestamp_millis();

        server
            .mock("GET", "/mcenter/v1/89654")
            .with_status(200)
            .with_body(match_entry(89654, "Live", now_ms - 3_600_000, 0).to_string())
            .expect_at_least(2)
            .create_async()
            .await;
        server
            .mock("GET", "/mcenter/v1/89654/scard")
            .with_status(200)
            .with_body(json!({ "scoreCard": [ { "runs": 166 } ] }).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/mcenter/v1/89654/overs")
            .with_status(200)
            .with_body(json!({ "overSummaryList": [] }).to_string())
            .create_async()
            .await;

        let (store, service) = service_with(Some(&server));

        let first = service
            .sync_match_detail("89654", &[SubResourceKind::Scorecard])
            .await
            .unwrap();
        assert!(first.scorecard.is_some());

        age_record(&store, "89654", 1);

        // Second refresh asks only for overs; the scorecard blob must survive.
        let second = service
            .sync_match_detail("89654", &[SubResourceKind::Overs])
            .await
            .unwrap();
        assert!(second.overs.is_some());
        assert!(second.scorecard.is_some(), "earlier blob erased by partial fetch");
    }

    #[tokio::test]
    async fn lifecycle_end_to_end_across_four_cycles() {
        let mut server = mockito::Server::new_async().await;
        let (store, service) = service_with(Some(&server));

        // Cycle 1: ten minutes before start, provider says "Match starts
        // at 14:00 GMT" - cached as UPCOMING.
        let start_ms = Utc::now().timestamp_millis() + 600_000;
        let m1 = server
            .mock("GET", "/mcenter/v1/9001")
            .with_status(200)
            .with_body(match_entry(9001, "Match starts at 14:00 GMT", start_ms, 0).to_string())
            .create_async()
            .await;
        let cycle1 = service.sync_match_detail("9001", &[]).await.unwrap();
        assert_eq!(cycle1.status, CanonicalStatus::Upcoming);
        assert!(!cycle1.is_live);
        m1.remove_async().await;

        // Cycle 2: start time has passed, provider text unchanged - the
        // liveness heuristic promotes to LIVE.
        let started_ms = Utc::now().timestamp_millis() - 600_000;
        let m2 = server
            .mock("GET", "/mcenter/v1/9001")
            .with_status(200)
            .with_body(match_entry(9001, "Match starts at 14:00 GMT", started_ms, 0).to_string())
            .create_async()
            .await;
        age_record(&store, "9001", 1);
        let cycle2 = service.sync_match_detail("9001", &[]).await.unwrap();
        assert_eq!(cycle2.status, CanonicalStatus::Live);
        assert!(cycle2.is_live);
        m2.remove_async().await;

        // Cycle 3: provider reports the result - COMPLETED, end date set.
        let ended_ms = Utc::now().timestamp_millis() - 60_000;
        let m3 = server
            .mock("GET", "/mcenter/v1/9001")
            .with_status(200)
            .with_body(
                match_entry(9001, "India won by 6 wickets", started_ms, ended_ms).to_string(),
            )
            .create_async()
            .await;
        age_record(&store, "9001", 1);
        let cycle3 = service.sync_match_detail("9001", &[]).await.unwrap();
        assert_eq!(cycle3.status, CanonicalStatus::Completed);
        assert!(cycle3.end_date.is_some());
        m3.remove_async().await;

        // Cycle 4: the provider erroneously flips back to "Live" - the
        // terminal status must not move.
        server
            .mock("GET", "/mcenter/v1/9001")
            .with_status(200)
            .with_body(match_entry(9001, "Live", started_ms, ended_ms).to_string())
            .create_async()
            .await;
        age_record(&store, "9001", 2);
        let cycle4 = service.sync_match_detail("9001", &[]).await.unwrap();
        assert_eq!(cycle4.status, CanonicalStatus::Completed);
        assert!(!cycle4.is_live);
    }

    #[tokio::test]
    async fn admin_override_reopens_a_terminal_match() {
        let (store, service) = service_with(None);

        let mut record = MatchRecord::new("7001", BsonDateTime::now());
        record.status = CanonicalStatus::Completed;
        store.insert_raw(record);

        let reopened = service
            .override_status("7001", CanonicalStatus::Live)
            .await
            .unwrap();
        assert_eq!(reopened.status, CanonicalStatus::Live);
        assert!(reopened.is_live);
    }

    #[tokio::test]
    async fn purge_removes_the_record() {
        let (store, service) = service_with(None);
        store.insert_raw(MatchRecord::new("gone", BsonDateTime::now()));

        assert!(service.purge("gone").await.unwrap());
        assert!(!service.purge("gone").await.unwrap());
        assert!(store.get("gone").is_none());
    }
}
