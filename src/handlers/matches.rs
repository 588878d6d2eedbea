use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::match_record::{
    CanonicalStatus, MatchListResponse, MatchRecord, SubResourceKind,
};
use crate::provider::client::ListCategory;
use crate::state::AppState;
use crate::store::mongo::MongoMatchStore;
use crate::store::{MatchFilter, MatchSort, MatchStore};
use crate::sync::orchestrator::MatchSyncService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusOverrideRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

fn sync_service(state: &AppState) -> MatchSyncService {
    let store: Arc<dyn MatchStore> = Arc::new(MongoMatchStore::new(&state.db));
    MatchSyncService::new(store, state.provider.clone())
}

fn list_response(matches: Vec<MatchRecord>) -> MatchListResponse {
    let count = matches.len();

    let last_updated = matches
        .iter()
        .filter_map(|m| m.updated_at)
        .max_by_key(|t| t.timestamp_millis())
        .unwrap_or_else(bson::DateTime::now);

    MatchListResponse {
        matches,
        count,
        last_updated,
    }
}

pub async fn get_live_matches(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MatchListResponse>> {
    tracing::debug!("🔥 GET /api/matches/live");

    let mut matches = sync_service(&state).sync_list(ListCategory::Live).await?;

    // Consumer-side recency window: drop matches that ended long ago but
    // are still marked live by a confused provider snapshot.
    let cutoff = Utc::now() - Duration::hours(state.config.live_listing_window_hours);
    matches.retain(|m| {
        m.end_date
            .map(|end| end.to_chrono() >= cutoff)
            .unwrap_or(true)
    });

    if let Some(limit) = query.limit {
        matches.truncate(limit.max(0) as usize);
    }

    Ok(Json(list_response(matches)))
}

pub async fn get_recent_matches(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MatchListResponse>> {
    tracing::debug!("🕒 GET /api/matches/recent");

    let mut matches = sync_service(&state).sync_list(ListCategory::Recent).await?;
    if let Some(limit) = query.limit {
        matches.truncate(limit.max(0) as usize);
    }

    Ok(Json(list_response(matches)))
}

pub async fn get_upcoming_matches(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MatchListResponse>> {
    tracing::debug!("⏳ GET /api/matches/upcoming");

    let mut matches = sync_service(&state)
        .sync_list(ListCategory::Upcoming)
        .await?;
    if let Some(limit) = query.limit {
        matches.truncate(limit.max(0) as usize);
    }

    Ok(Json(list_response(matches)))
}

pub async fn get_match_by_id(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchRecord>> {
    tracing::debug!("🔍 GET /api/matches/{}", match_id);

    let record = sync_service(&state)
        .sync_match_detail(&match_id, &[])
        .await?;
    Ok(Json(record))
}

/// Cache-only text search over titles and team names. Never touches the
/// provider.
pub async fn search_matches(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<MatchListResponse>> {
    tracing::debug!("🔍 GET /api/matches/search?q={}", query.q);

    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::invalid_query("q must not be empty"));
    }

    let mut filter = MatchFilter {
        text: Some(q.to_string()),
        ..MatchFilter::default()
    };
    if let Some(status) = &query.status {
        let parsed = CanonicalStatus::parse(status)
            .ok_or_else(|| AppError::invalid_query(format!("unknown status: {}", status)))?;
        filter.statuses = vec![parsed];
    }

    let store = MongoMatchStore::new(&state.db);
    let matches = store
        .find_matches(&filter, MatchSort::PriorityThenRecent, query.limit.or(Some(20)))
        .await
        .map_err(|e| AppError::PersistenceFailure(e.to_string()))?;

    Ok(Json(list_response(matches)))
}

async fn sub_resource(
    state: &AppState,
    match_id: &str,
    kind: SubResourceKind,
) -> Result<Json<Value>> {
    let record = sync_service(state)
        .sync_match_detail(match_id, &[kind])
        .await?;

    let blob = match kind {
        SubResourceKind::Scorecard => record.scorecard,
        SubResourceKind::HistoricalScorecard => record.historical_scorecard,
        SubResourceKind::Commentary => record.commentary,
        SubResourceKind::HistoricalCommentary => record.historical_commentary,
        SubResourceKind::Overs => record.overs,
    };

    // Absent after a sync attempt means the provider doesn't have it yet
    // either (pre-match scorecard and the like).
    let blob = blob.ok_or(AppError::DocumentNotFound)?;

    Ok(Json(json!({
        "match_id": match_id,
        "resource": kind.as_str(),
        "data": blob.data,
        "last_updated": blob.last_updated.to_chrono().to_rfc3339(),
    })))
}

pub async fn get_scorecard(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>> {
    sub_resource(&state, &match_id, SubResourceKind::Scorecard).await
}

pub async fn get_historical_scorecard(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>> {
    sub_resource(&state, &match_id, SubResourceKind::HistoricalScorecard).await
}

pub async fn get_commentary(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>> {
    sub_resource(&state, &match_id, SubResourceKind::Commentary).await
}

pub async fn get_historical_commentary(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>> {
    sub_resource(&state, &match_id, SubResourceKind::HistoricalCommentary).await
}

pub async fn get_overs(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>> {
    sub_resource(&state, &match_id, SubResourceKind::Overs).await
}

/// Admin: force a status, including off a terminal one. The only write
/// path allowed to do that.
pub async fn override_match_status(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(payload): Json<StatusOverrideRequest>,
) -> Result<Json<MatchRecord>> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let status = CanonicalStatus::parse(&payload.status).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Invalid status '{}'. Must be one of: upcoming, live, completed, abandoned, cancelled",
            payload.status
        ))
    })?;

    tracing::info!("📝 admin override: match {} -> {}", match_id, status.as_str());

    let record = sync_service(&state)
        .override_status(&match_id, status)
        .await?;
    Ok(Json(record))
}

/// Admin: hard delete (test/demo data cleanup).
pub async fn purge_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>> {
    let removed = sync_service(&state).purge(&match_id).await?;
    if !removed {
        return Err(AppError::MatchNotFound(match_id));
    }

    tracing::info!("🗑️ purged match {}", match_id);
    Ok(Json(json!({ "success": true, "match_id": match_id })))
}
