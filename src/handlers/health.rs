use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "hubspot-crm-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Which credential paths are available to the CRM tools
pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_integration_status_check();

    let token = match &state.token_manager {
        Some(manager) => manager.current_token().await,
        None => None,
    };

    Json(json!({
        "service": "hubspot-crm-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()),
        "hubspot": {
            "api_base_url": state.settings.hubspot.api_base_url,
            "oauth_configured": state.token_manager.is_some(),
            "api_key_configured": state.settings.hubspot.api_key_configured(),
            "oauth_token_stored": token.is_some(),
            "token_expires_at": token.as_ref().and_then(|t| t.expires_at).map(|t| t.to_rfc3339()),
            "token_expired": token.as_ref().map(|t| t.is_expired()),
        }
    }))
}
