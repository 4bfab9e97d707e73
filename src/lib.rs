// HubSpot CRM middleware library
// Exposes modules for the binary and for tests

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use hubspot::{CredentialStore, HubSpotClient, HubSpotTools, InMemoryCredentialStore};

pub mod auth;
pub mod config;
pub mod handlers;
pub mod utils;

use auth::TokenManager;
use utils::logging::*;
use utils::AppResult;

// AppState is shared by every router
pub struct AppState {
    pub settings: config::Settings,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub tools: HubSpotTools,
    /// `None` when no OAuth client id/secret is configured
    pub token_manager: Option<Arc<TokenManager>>,
}

impl AppState {
    pub fn from_settings(settings: config::Settings) -> AppResult<Self> {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let store: Arc<dyn CredentialStore> = credentials.clone();

        let client = HubSpotClient::with_base_url(
            settings.hubspot.api_base_url.clone(),
            Some(store),
            settings.hubspot.api_key.clone(),
        )?;

        let token_manager = settings
            .hubspot
            .oauth_provider()?
            .map(|provider| Arc::new(TokenManager::new(provider, credentials.clone())));

        if token_manager.is_none() && !settings.hubspot.api_key_configured() {
            log_warning("⚠️  Neither HUBSPOT_CLIENT_ID/SECRET nor HUBSPOT_API_KEY configured. Tool calls will fail.");
        }

        Ok(Self {
            settings,
            credentials,
            tools: HubSpotTools::with_client(client),
            token_manager,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::status_check))
        .route("/tools", get(handlers::list_tools))
        .route("/tools/:name", post(handlers::call_tool))
        .with_state(state.clone());

    if let Some(token_manager) = state.token_manager.clone() {
        log_info("✅ OAuth2 endpoints enabled: /auth/hubspot, /auth/hubspot/callback");

        let oauth_router = Router::new()
            .route("/auth/hubspot", get(auth::start_oauth_flow))
            .route("/auth/hubspot/callback", get(auth::handle_oauth_callback))
            .route("/auth/hubspot/token-info", get(auth::get_token_info))
            .route("/auth/hubspot/refresh", post(auth::refresh_token))
            .with_state(token_manager);

        app = app.merge(oauth_router);
    } else {
        log_warning("⚠️  OAuth2 endpoints disabled (missing HUBSPOT_CLIENT_ID or HUBSPOT_CLIENT_SECRET)");
    }

    app.layer(TraceLayer::new_for_http())
}
