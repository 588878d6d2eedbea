// provider/client.rs
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Per-request timeout for provider fetches. A slow sub-resource is treated
/// as failed for that resource only, never as a flow-level error.
const FETCH_TIMEOUT: Duration = Duration::from_secs(12);

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP 429 from the provider. The current sync flow must fall back to
    /// cache without retrying.
    #[error("provider rate limit hit")]
    RateLimited,

    #[error("provider request timed out: {0}")]
    Timeout(String),

    #[error("provider network error: {0}")]
    Network(String),

    /// 404/400 on a detail sub-resource - the resource does not exist yet
    /// (e.g. a scorecard before the toss). Not an error to the caller.
    #[error("provider resource not available (HTTP {0})")]
    NotAvailable(u16),

    #[error("provider returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("provider response decode error: {0}")]
    Decode(String),
}

/// Which provider list endpoint to hit. The live list gets a different
/// classifier default downstream, so the category travels with the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCategory {
    Live,
    Recent,
    Upcoming,
}

impl ListCategory {
    pub fn path(&self) -> &'static str {
        match self {
            ListCategory::Live => "/matches/v1/live",
            ListCategory::Recent => "/matches/v1/recent",
            ListCategory::Upcoming => "/matches/v1/upcoming",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListCategory::Live => "live",
            ListCategory::Recent => "recent",
            ListCategory::Upcoming => "upcoming",
        }
    }
}

/// HTTP client for the RapidAPI-hosted cricket data provider.
#[derive(Debug, Clone)]
pub struct CricketDataClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl CricketDataClient {
    pub fn new(api_key: String, api_host: String) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        CricketDataClient {
            client,
            base_url: format!("https://{}", api_host),
            api_key,
            api_host,
        }
    }

    /// Point the client at a different base URL. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    // ----- match list endpoints -----

    pub async fn fetch_match_list(&self, category: ListCategory) -> ProviderResult<Value> {
        self.get_json(category.path()).await
    }

    // ----- per-match sub-resource endpoints -----

    pub async fn fetch_match_info(&self, match_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/mcenter/v1/{}", match_id)).await
    }

    pub async fn fetch_scorecard(&self, match_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/mcenter/v1/{}/scard", match_id)).await
    }

    pub async fn fetch_historical_scorecard(&self, match_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/mcenter/v1/{}/hscard", match_id)).await
    }

    pub async fn fetch_commentary(&self, match_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/mcenter/v1/{}/comm", match_id)).await
    }

    pub async fn fetch_historical_commentary(&self, match_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/mcenter/v1/{}/hcomm", match_id)).await
    }

    pub async fn fetch_overs(&self, match_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/mcenter/v1/{}/overs", match_id)).await
    }

    // ----- sibling domain endpoints (simple sync jobs) -----

    pub async fn fetch_news_index(&self) -> ProviderResult<Value> {
        self.get_json("/news/v1/index").await
    }

    pub async fn fetch_rankings(&self, category: &str, format: &str) -> ProviderResult<Value> {
        self.get_json(&format!(
            "/stats/v1/rankings/{}?formatType={}",
            category, format
        ))
        .await
    }

    pub async fn fetch_team(&self, team_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/teams/v1/{}", team_id)).await
    }

    pub async fn fetch_player(&self, player_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/stats/v1/player/{}", player_id)).await
    }

    pub async fn fetch_venue(&self, venue_id: &str) -> ProviderResult<Value> {
        self.get_json(&format!("/venues/v1/{}", venue_id)).await
    }

    async fn get_json(&self, path: &str) -> ProviderResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("provider GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(url.clone())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => response
                .json::<Value>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string())),
            429 => {
                warn!("provider rate limit hit on {}", path);
                Err(ProviderError::RateLimited)
            }
            400 | 404 => Err(ProviderError::NotAvailable(status.as_u16())),
            code => Err(ProviderError::Http { status: code, url }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> CricketDataClient {
        CricketDataClient::new("test-key".into(), "example.test".into())
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn fetches_and_decodes_a_list() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/matches/v1/live")
            .match_header("x-rapidapi-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"typeMatches": []}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let value = client.fetch_match_list(ListCategory::Live).await.unwrap();
        assert!(value.get("typeMatches").is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/mcenter/v1/41881")
            .with_status(429)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_match_info("41881").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));
    }

    #[tokio::test]
    async fn missing_subresource_maps_to_not_available() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/mcenter/v1/41881/scard")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_scorecard("41881").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotAvailable(404)));
    }

    #[tokio::test]
    async fn server_errors_carry_status_and_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/matches/v1/recent")
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_match_list(ListCategory::Recent).await.unwrap_err();
        match err {
            ProviderError::Http { status, .. } => assert_eq!(status, 503),
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn garbage_body_maps_to_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/news/v1/index")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_news_index().await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
