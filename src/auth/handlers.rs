//! OAuth2 HTTP Handlers
//!
//! Endpoints that start and complete the HubSpot authorization flow and
//! expose the stored token.

use axum::{
    extract::{Query, State},
    response::{Html, Json, Redirect},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use hubspot::OAuth2Token;

use super::TokenManager;
use crate::utils::logging::*;
use crate::utils::{html_escape, truncate_safe, truncate_with_suffix, AppError, AppResult};

/// Query string HubSpot appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GET /auth/hubspot
///
/// Redirects the user to HubSpot's consent page
pub async fn start_oauth_flow(State(token_manager): State<Arc<TokenManager>>) -> AppResult<Redirect> {
    log_info("🚀 [OAuth2] Starting HubSpot authorization...");

    let auth_url = token_manager.begin_authorization().await?;

    log_info(&format!("↗️  [OAuth2] Redirecting to: {}", auth_url));

    Ok(Redirect::to(&auth_url))
}

/// GET /auth/hubspot/callback?code=XXX&state=YYY
///
/// Checks the `state`, exchanges the code and stores the token
pub async fn handle_oauth_callback(
    State(token_manager): State<Arc<TokenManager>>,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Html<String>> {
    log_info("📥 [OAuth2] Callback received");

    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or_default();
        log_error(&format!("❌ [OAuth2] Authorization denied: {} {}", error, detail));
        return Ok(render_error_page(&error, &detail));
    }

    let state = params.state.unwrap_or_default();
    if !token_manager.consume_state(&state).await {
        log_validation_error("state", "unknown or already used");
        return Err(AppError::ValidationError("Invalid or expired OAuth state".to_string()));
    }

    let code = params.code.filter(|c| !c.is_empty()).ok_or_else(|| {
        log_validation_error("code", "missing from callback");
        AppError::ValidationError("Missing code parameter".to_string())
    })?;

    log_info(&format!("🔑 [OAuth2] Code received: {}...", truncate_safe(&code, 10)));

    let token = token_manager.complete_authorization(&code).await.map_err(|e| {
        log_hubspot_api_error("exchange_code", &e.to_string());
        e
    })?;

    log_info(&format!("✅ [OAuth2] Token obtained: {}...", truncate_safe(&token.access_token, 8)));

    Ok(render_success_page(&token))
}

/// GET /auth/hubspot/token-info
pub async fn get_token_info(State(token_manager): State<Arc<TokenManager>>) -> AppResult<Json<Value>> {
    log_request_received("/auth/hubspot/token-info", "GET");

    let info = token_manager.token_info().await.map_err(|e| {
        log_hubspot_api_error("token_info", &e.to_string());
        e
    })?;

    Ok(Json(info))
}

/// POST /auth/hubspot/refresh
pub async fn refresh_token(State(token_manager): State<Arc<TokenManager>>) -> AppResult<Json<Value>> {
    log_request_received("/auth/hubspot/refresh", "POST");

    let token = token_manager.refresh().await?;

    Ok(Json(token_summary(&token)))
}

/// Token fields safe to return over HTTP (no secrets)
pub fn token_summary(token: &OAuth2Token) -> Value {
    json!({
        "token_type": token.token_type,
        "expires_in": token.expires_in,
        "expires_at": token.expires_at.map(|t| t.to_rfc3339()),
        "scopes": token.scopes(),
        "has_refresh_token": token.refresh_token.is_some(),
    })
}

fn render_success_page(token: &OAuth2Token) -> Html<String> {
    let scopes: Vec<String> = token
        .scopes()
        .iter()
        .map(|s| format!("<li><code>{}</code></li>", html_escape(s)))
        .collect();

    let expiry = token
        .expires_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    Html(format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>HubSpot OAuth - Connected</title>
            <meta charset="UTF-8">
            <style>
                body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
                       max-width: 700px; margin: 50px auto; padding: 20px; background: #f5f8fa; }}
                .container {{ background: white; padding: 30px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
                .success {{ background: #e5f5f8; border: 2px solid #00a4bd; padding: 20px; border-radius: 8px; }}
                h1 {{ color: #ff7a59; margin-top: 0; }}
                code {{ background: #eaf0f6; padding: 2px 6px; border-radius: 4px; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="success">
                    <h1>✅ HubSpot connected</h1>
                    <p>Access token <code>{}</code> stored. Expires at {}.</p>
                    <h3>Granted scopes</h3>
                    <ul>{}</ul>
                </div>
                <p>You can close this window.</p>
            </div>
        </body>
        </html>
        "#,
        html_escape(&truncate_with_suffix(&token.access_token, 8, "...")),
        expiry,
        scopes.join("\n")
    ))
}

fn render_error_page(error: &str, description: &str) -> Html<String> {
    Html(format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>HubSpot OAuth - Error</title>
            <meta charset="UTF-8">
            <style>
                body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
                       max-width: 600px; margin: 50px auto; padding: 20px; background: #f5f8fa; }}
                .container {{ background: white; padding: 30px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
                .error {{ background: #fde8e8; border: 2px solid #f2545b; padding: 20px; border-radius: 8px; }}
                h1 {{ color: #c0392b; margin-top: 0; }}
                a {{ color: #0091ae; font-weight: bold; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="error">
                    <h1>❌ Authorization failed</h1>
                    <p><strong>Error:</strong> {}</p>
                    <p>{}</p>
                    <p><a href="/auth/hubspot">← Try again</a></p>
                </div>
            </div>
        </body>
        </html>
        "#,
        html_escape(error),
        html_escape(description)
    ))
}
