use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hubspot::HubSpotError;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    HubSpotApi(String),
    ConfigError(String),
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    ValidationError(String),
    Unauthorized(String),
    NotFound(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::HubSpotApi(msg) => write!(f, "HubSpot API error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err)
    }
}

impl From<HubSpotError> for AppError {
    fn from(err: HubSpotError) -> Self {
        match err {
            HubSpotError::HttpError(e) => AppError::HttpError(e),
            HubSpotError::ConfigError(msg) => AppError::ConfigError(msg),
            HubSpotError::UrlError(e) => AppError::ConfigError(e.to_string()),
            e @ HubSpotError::MissingCredentials => AppError::Unauthorized(e.to_string()),
            HubSpotError::UnknownTool(name) => AppError::NotFound(format!("Unknown tool: {}", name)),
            e @ HubSpotError::InvalidArguments { .. } => AppError::ValidationError(e.to_string()),
            e @ (HubSpotError::TokenInfo { .. } | HubSpotError::JsonError(_)) => AppError::HubSpotApi(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::HubSpotApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::JsonError(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::HttpError(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
