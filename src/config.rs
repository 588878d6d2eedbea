// config.rs
use std::env;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub port: u16,
    pub host: String,

    /// RapidAPI credentials for the cricket data provider. Both may be
    /// absent: the service then runs in cache-only mode and never fetches.
    pub cricket_api_key: Option<String>,
    pub cricket_api_host: String,

    /// Store-side window for the live listing: matches whose end_date is
    /// older than this many hours are excluded. A consumer-side knob, the
    /// sync core never reads it.
    pub live_listing_window_hours: i64,

    /// Flat TTL for the simple sync jobs (news, players, teams, venues,
    /// rankings), in minutes.
    pub simple_sync_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let cricket_api_key = env::var("CRICKET_API_KEY").ok().filter(|k| !k.is_empty());

        if cricket_api_key.is_none() {
            tracing::warn!("CRICKET_API_KEY not set - running in cache-only mode");
        }

        AppConfig {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "crichub".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cricket_api_key,
            cricket_api_host: env::var("CRICKET_API_HOST")
                .unwrap_or_else(|_| "cricbuzz-cricket.p.rapidapi.com".to_string()),
            live_listing_window_hours: env::var("LIVE_LISTING_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            simple_sync_ttl_minutes: env::var("SIMPLE_SYNC_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        }
    }

    pub fn provider_configured(&self) -> bool {
        self.cricket_api_key.is_some()
    }

    pub fn get_config_info(&self) -> serde_json::Value {
        serde_json::json!({
            "database_name": self.database_name,
            "provider_configured": self.provider_configured(),
            "provider_host": self.cricket_api_host,
            "live_listing_window_hours": self.live_listing_window_hours,
            "simple_sync_ttl_minutes": self.simple_sync_ttl_minutes,
            "port": self.port,
            "host": self.host,
        })
    }
}
