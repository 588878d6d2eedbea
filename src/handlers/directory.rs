//! Read endpoints for the directory collections (teams, players, venues).
//! All three share the same stale-triggered entity refresh.

use axum::{
    extract::{Path, State},
    response::Json,
};
use bson::Document;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, Result};
use crate::models::player::Player;
use crate::models::team::Team;
use crate::models::venue::VenueDoc;
use crate::state::AppState;
use crate::sync::simple::SimpleSyncService;

fn service(state: &AppState) -> SimpleSyncService {
    SimpleSyncService::new(
        state.db.clone(),
        state.provider.clone(),
        state.config.simple_sync_ttl_minutes,
    )
}

fn typed<T: DeserializeOwned>(doc: Document) -> Result<T> {
    bson::from_document(doc).map_err(|e| AppError::PersistenceFailure(e.to_string()))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Team>> {
    tracing::debug!("GET /api/teams/{}", team_id);
    let doc = service(&state).entity("teams", "team_id", &team_id).await?;
    Ok(Json(typed(doc)?))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>> {
    tracing::debug!("GET /api/players/{}", player_id);
    let doc = service(&state)
        .entity("players", "player_id", &player_id)
        .await?;
    Ok(Json(typed(doc)?))
}

pub async fn get_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Json<VenueDoc>> {
    tracing::debug!("GET /api/venues/{}", venue_id);
    let doc = service(&state)
        .entity("venues", "venue_id", &venue_id)
        .await?;
    Ok(Json(typed(doc)?))
}
