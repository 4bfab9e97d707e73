//! Token Manager
//!
//! Holds the current HubSpot OAuth2 token, refreshes it, and publishes the
//! access token to the credential store the CRM tools read from.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use hubspot::{HubSpotOAuth2Provider, InMemoryCredentialStore, OAuth2Provider, OAuth2Token, OAUTH_TOKEN_CREDENTIAL};

use crate::utils::logging::*;
use crate::utils::{truncate_safe, AppError, AppResult};

/// Tokens expiring within this window are refreshed before use
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Issued `state` values are accepted on a callback for this long
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound on outstanding states; the oldest is dropped past it
pub const MAX_PENDING_STATES: usize = 1024;

pub struct TokenManager {
    provider: HubSpotOAuth2Provider,
    credentials: Arc<InMemoryCredentialStore>,
    token: RwLock<Option<OAuth2Token>>,
    // Issued `state` values not yet seen on a callback, with issue time
    pending_states: RwLock<HashMap<String, Instant>>,
    state_ttl: Duration,
}

impl TokenManager {
    pub fn new(provider: HubSpotOAuth2Provider, credentials: Arc<InMemoryCredentialStore>) -> Self {
        Self {
            provider,
            credentials,
            token: RwLock::new(None),
            pending_states: RwLock::new(HashMap::new()),
            state_ttl: STATE_TTL,
        }
    }

    pub fn with_state_ttl(mut self, ttl: Duration) -> Self {
        self.state_ttl = ttl;
        self
    }

    pub fn provider(&self) -> &HubSpotOAuth2Provider {
        &self.provider
    }

    /// Authorization URL carrying a freshly issued random `state`
    pub async fn begin_authorization(&self) -> AppResult<String> {
        let state = uuid::Uuid::new_v4().to_string();
        let url = self.provider.get_authorization_url(&state, None, None, &[])?;

        let mut pending = self.pending_states.write().await;
        self.prune_expired(&mut pending);
        if pending.len() >= MAX_PENDING_STATES {
            if let Some(oldest) = pending.iter().min_by_key(|(_, issued)| **issued).map(|(s, _)| s.clone()) {
                pending.remove(&oldest);
                log_warning("⚠️ [TokenManager] Too many pending states, dropped the oldest");
            }
        }
        pending.insert(state, Instant::now());

        Ok(url)
    }

    /// True at most once per issued state, and only within the state TTL
    pub async fn consume_state(&self, state: &str) -> bool {
        let mut pending = self.pending_states.write().await;
        self.prune_expired(&mut pending);
        pending.remove(state).is_some()
    }

    pub async fn pending_state_count(&self) -> usize {
        self.pending_states.read().await.len()
    }

    fn prune_expired(&self, pending: &mut HashMap<String, Instant>) {
        let ttl = self.state_ttl;
        pending.retain(|_, issued| issued.elapsed() < ttl);
    }

    /// Exchange a callback code and keep the resulting token
    pub async fn complete_authorization(&self, code: &str) -> AppResult<OAuth2Token> {
        log_info(&format!("🔑 [TokenManager] Exchanging code {}...", truncate_safe(code, 8)));

        let token = self.provider.exchange_code(code, None, &[]).await?;
        self.store_token(token.clone()).await;

        Ok(token)
    }

    pub async fn store_token(&self, token: OAuth2Token) {
        self.credentials.set(OAUTH_TOKEN_CREDENTIAL, token.access_token.clone());
        *self.token.write().await = Some(token);

        log_info("💾 [TokenManager] Token stored");
    }

    pub async fn current_token(&self) -> Option<OAuth2Token> {
        self.token.read().await.clone()
    }

    /// Refresh using the stored refresh token
    pub async fn refresh(&self) -> AppResult<OAuth2Token> {
        let refresh_token = self
            .token
            .read()
            .await
            .as_ref()
            .and_then(|token| token.refresh_token.clone())
            .ok_or_else(|| {
                AppError::ValidationError("No refresh token available. Visit /auth/hubspot to authorize.".to_string())
            })?;

        log_info("🔄 [TokenManager] Refreshing access token...");

        let token = self.provider.refresh_token(&refresh_token).await.map_err(|e| {
            log_error(&format!("❌ [TokenManager] Refresh failed: {}", e));
            AppError::from(e)
        })?;
        self.store_token(token.clone()).await;

        Ok(token)
    }

    /// Refresh when the token expires within [`REFRESH_MARGIN`] and a
    /// refresh token exists. Returns whether a refresh happened.
    pub async fn ensure_fresh(&self) -> AppResult<bool> {
        let needs_refresh = matches!(
            &*self.token.read().await,
            Some(token) if token.refresh_token.is_some() && token.expires_within(REFRESH_MARGIN)
        );

        if !needs_refresh {
            return Ok(false);
        }

        self.refresh().await?;
        Ok(true)
    }

    /// HubSpot's metadata for the stored access token
    pub async fn token_info(&self) -> AppResult<Value> {
        let token = self.current_token().await.ok_or_else(|| {
            AppError::Unauthorized("No OAuth2 token stored. Visit /auth/hubspot to authorize.".to_string())
        })?;

        Ok(self.provider.get_token_info(&token.access_token).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubspot::{CredentialStore, OAuth2Config};
    use httpmock::prelude::*;
    use serde_json::json;

    fn manager_for(server: &MockServer) -> (TokenManager, Arc<InMemoryCredentialStore>) {
        let config = OAuth2Config::new(
            server.url("/oauth/v1/token"),
            "https://app.hubspot.com/oauth/authorize",
            "cid",
            "secret",
            vec!["crm.objects.contacts.read".to_string()],
        );
        let provider = HubSpotOAuth2Provider::with_config(config, Some("https://app.example.com/cb".to_string()))
            .unwrap()
            .with_token_info_url(server.url("/oauth/v1/access-tokens"));
        let credentials = Arc::new(InMemoryCredentialStore::new());
        (TokenManager::new(provider, credentials.clone()), credentials)
    }

    fn token(body: serde_json::Value) -> OAuth2Token {
        OAuth2Token::from_response(body).unwrap()
    }

    #[tokio::test]
    async fn test_state_is_single_use() {
        let server = MockServer::start_async().await;
        let (manager, _) = manager_for(&server);

        let state = state_of(&manager.begin_authorization().await.unwrap());

        assert!(manager.consume_state(&state).await);
        assert!(!manager.consume_state(&state).await);
        assert!(!manager.consume_state("forged").await);
    }

    fn state_of(url: &str) -> String {
        url.split(['?', '&'])
            .find_map(|pair| pair.strip_prefix("state="))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_expired_state_is_rejected() {
        let server = MockServer::start_async().await;
        let (manager, _) = manager_for(&server);
        let manager = manager.with_state_ttl(Duration::ZERO);

        let state = state_of(&manager.begin_authorization().await.unwrap());

        assert!(!manager.consume_state(&state).await);
        assert_eq!(manager.pending_state_count().await, 0);
    }

    #[tokio::test]
    async fn test_pending_states_are_bounded() {
        let server = MockServer::start_async().await;
        let (manager, _) = manager_for(&server);

        let first = state_of(&manager.begin_authorization().await.unwrap());
        for _ in 0..MAX_PENDING_STATES + 10 {
            manager.begin_authorization().await.unwrap();
        }

        assert_eq!(manager.pending_state_count().await, MAX_PENDING_STATES);
        assert!(!manager.consume_state(&first).await);
    }

    #[tokio::test]
    async fn test_complete_authorization_publishes_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth/v1/token")
                    .body_contains("grant_type=authorization_code")
                    .body_contains("code=abc");
                then.status(200)
                    .json_body(json!({ "access_token": "T", "refresh_token": "R", "expires_in": 3600 }));
            })
            .await;
        let (manager, credentials) = manager_for(&server);

        let token = manager.complete_authorization("abc").await.unwrap();

        mock.assert_async().await;
        assert_eq!(token.access_token, "T");
        assert_eq!(credentials.get(OAUTH_TOKEN_CREDENTIAL).as_deref(), Some("T"));
        assert_eq!(manager.current_token().await.map(|t| t.access_token).as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let server = MockServer::start_async().await;
        let (manager, _) = manager_for(&server);

        assert!(matches!(manager.refresh().await, Err(AppError::ValidationError(_))));

        manager.store_token(token(json!({ "access_token": "T" }))).await;
        assert!(matches!(manager.refresh().await, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_ensure_fresh_refreshes_expiring_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth/v1/token")
                    .body_contains("grant_type=refresh_token")
                    .body_contains("refresh_token=R");
                then.status(200)
                    .json_body(json!({ "access_token": "T2", "expires_in": 1800 }));
            })
            .await;
        let (manager, credentials) = manager_for(&server);

        manager
            .store_token(token(json!({ "access_token": "T1", "refresh_token": "R", "expires_in": 30 })))
            .await;

        assert!(manager.ensure_fresh().await.unwrap());
        mock.assert_async().await;

        let current = manager.current_token().await.unwrap();
        assert_eq!(current.access_token, "T2");
        assert_eq!(current.refresh_token.as_deref(), Some("R"));
        assert_eq!(credentials.get(OAUTH_TOKEN_CREDENTIAL).as_deref(), Some("T2"));

        // Fresh now: no second call
        assert!(!manager.ensure_fresh().await.unwrap());
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_ensure_fresh_skips_long_lived_token() {
        let server = MockServer::start_async().await;
        let (manager, _) = manager_for(&server);

        assert!(!manager.ensure_fresh().await.unwrap());

        manager
            .store_token(token(json!({ "access_token": "T", "refresh_token": "R", "expires_in": 3600 })))
            .await;
        assert!(!manager.ensure_fresh().await.unwrap());
    }

    #[tokio::test]
    async fn test_token_info() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/oauth/v1/access-tokens/T");
                then.status(200).json_body(json!({ "hub_id": 42, "user": "a@b.com" }));
            })
            .await;
        let (manager, _) = manager_for(&server);

        assert!(matches!(manager.token_info().await, Err(AppError::Unauthorized(_))));

        manager.store_token(token(json!({ "access_token": "T" }))).await;
        let info = manager.token_info().await.unwrap();
        assert_eq!(info["hub_id"], 42);
    }
}
