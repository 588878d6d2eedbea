// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Document not found")]
    DocumentNotFound,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Provider rate limit exceeded")]
    RateLimitExceeded,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MongoDB(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            AppError::MatchNotFound(_) => (StatusCode::NOT_FOUND, "Match not found".to_string()),
            AppError::DocumentNotFound => (StatusCode::NOT_FOUND, "Document not found".to_string()),
            AppError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "Invalid query".to_string()),
            AppError::ValidationError(_) => {
                (StatusCode::BAD_REQUEST, "Validation failed".to_string())
            }
            AppError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".to_string(),
            ),
            AppError::PersistenceFailure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Persistence failure".to_string(),
            ),
            AppError::ServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
            ),
            AppError::ExternalApi(_) => (StatusCode::BAD_GATEWAY, "External API error".to_string()),
            AppError::ConfigurationError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

// Manual From implementations
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApi(format!("HTTP request failed: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        AppError::InvalidQuery(msg.into())
    }

    pub fn external_api(msg: impl Into<String>) -> Self {
        AppError::ExternalApi(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
