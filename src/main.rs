use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod database;
mod errors;
mod handlers;
mod models;
mod provider;
mod routes;
mod state;
mod store;
mod sync;

use config::AppConfig;
use database::connection::get_db_client;
use provider::client::CricketDataClient;
use state::AppState;
use store::mongo::MongoMatchStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();
    tracing::info!("🔧 config: {}", config.get_config_info());

    let db = get_db_client(&config).await;
    let app_state = initialize_app_state(db, config).await;

    let app = build_router(app_state);
    start_server(app).await;
}

async fn initialize_app_state(db: mongodb::Database, config: AppConfig) -> AppState {
    // The versioned upsert path leans on the unique match_id index; a
    // failure here is logged but not fatal (the index usually exists).
    if let Err(e) = MongoMatchStore::new(&db).ensure_indexes().await {
        tracing::warn!("⚠️ could not ensure matches indexes: {}", e);
    }

    let mut app_state = AppState::new(db, config.clone());

    match &config.cricket_api_key {
        Some(api_key) => {
            let client = CricketDataClient::new(api_key.clone(), config.cricket_api_host.clone());
            app_state = app_state.with_provider(Arc::new(client));
            tracing::info!("✅ cricket data provider configured ({})", config.cricket_api_host);
        }
        None => {
            // Valid steady state: serve whatever the cache holds, never fetch.
            tracing::warn!("⚠️ no provider credentials - cache-only mode");
        }
    }

    app_state
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api/matches", routes::matches::routes())
        .nest("/api/admin", routes::matches::admin_routes())
        .nest("/api/news", routes::news::routes())
        .nest("/api/rankings", routes::rankings::routes())
        .nest("/api", routes::directory::routes())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn start_server(app: Router) {
    let port = std::env::var("PORT").unwrap_or_else(|_| "10000".to_string());
    let addr = SocketAddr::from(([0, 0, 0, 0], port.parse().unwrap_or(10000)));

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            axum::serve(listener, app).await.unwrap();
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🏏 CricHub Match Cache API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    use mongodb::bson::doc;

    let db_status = match state.db.run_command(doc! {"ping": 1}).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "healthy",
        "database": db_status,
        "provider": state.provider.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
