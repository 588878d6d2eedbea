use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::matches;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(matches::get_live_matches))
        .route("/recent", get(matches::get_recent_matches))
        .route("/upcoming", get(matches::get_upcoming_matches))
        .route("/search", get(matches::search_matches))
        .route("/:id", get(matches::get_match_by_id))
        .route("/:id/scorecard", get(matches::get_scorecard))
        .route("/:id/historical-scorecard", get(matches::get_historical_scorecard))
        .route("/:id/commentary", get(matches::get_commentary))
        .route("/:id/historical-commentary", get(matches::get_historical_commentary))
        .route("/:id/overs", get(matches::get_overs))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/matches/:id/status", post(matches::override_match_status))
        .route("/matches/:id", delete(matches::purge_match))
}
