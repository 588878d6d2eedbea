use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::errors::{AppError, Result};
use crate::models::ranking::RankingTable;
use crate::state::AppState;
use crate::sync::simple::SimpleSyncService;

const CATEGORIES: &[&str] = &["batsmen", "bowlers", "allrounders", "teams"];
const FORMATS: &[&str] = &["test", "odi", "t20"];

pub async fn get_rankings(
    State(state): State<AppState>,
    Path((category, format)): Path<(String, String)>,
) -> Result<Json<RankingTable>> {
    tracing::debug!("🏆 GET /api/rankings/{}/{}", category, format);

    if !CATEGORIES.contains(&category.as_str()) {
        return Err(AppError::invalid_query(format!(
            "unknown ranking category '{}', expected one of {:?}",
            category, CATEGORIES
        )));
    }
    if !FORMATS.contains(&format.as_str()) {
        return Err(AppError::invalid_query(format!(
            "unknown format '{}', expected one of {:?}",
            format, FORMATS
        )));
    }

    let service = SimpleSyncService::new(
        state.db.clone(),
        state.provider.clone(),
        state.config.simple_sync_ttl_minutes,
    );

    let table = service.rankings(&category, &format).await?;
    Ok(Json(table))
}
