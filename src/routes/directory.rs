use axum::{routing::get, Router};

use crate::handlers::directory;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams/:id", get(directory::get_team))
        .route("/players/:id", get(directory::get_player))
        .route("/venues/:id", get(directory::get_venue))
}
