use std::sync::Arc;

use mongodb::Database;

use crate::config::AppConfig;
use crate::provider::client::CricketDataClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
    /// Absent when provider credentials are not configured; the service
    /// then serves cache only and never fetches.
    pub provider: Option<Arc<CricketDataClient>>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState {
            db,
            config,
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<CricketDataClient>) -> Self {
        self.provider = Some(provider);
        self
    }
}
