use axum::{extract::State, response::Json};

use crate::errors::Result;
use crate::models::news::NewsListResponse;
use crate::state::AppState;
use crate::sync::simple::SimpleSyncService;

pub async fn get_news(State(state): State<AppState>) -> Result<Json<NewsListResponse>> {
    tracing::debug!("📰 GET /api/news");

    let service = SimpleSyncService::new(
        state.db.clone(),
        state.provider.clone(),
        state.config.simple_sync_ttl_minutes,
    );

    let articles = service.news().await?;
    let count = articles.len();

    Ok(Json(NewsListResponse { articles, count }))
}
