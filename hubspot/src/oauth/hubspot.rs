//! HubSpot OAuth2 provider
//!
//! Supports the authorization-code and refresh-token grants only; HubSpot
//! has no client-credentials flow, every token starts with user consent.
//!
//! ```rust,ignore
//! use hubspot::oauth::{HubSpotOAuth2Provider, OAuth2Provider};
//!
//! let provider = HubSpotOAuth2Provider::new(
//!     client_id,
//!     client_secret,
//!     Some("https://your-app.com/oauth/callback".to_string()),
//!     None,
//! )?;
//!
//! let url = provider.get_authorization_url("random-state", None, None, &[])?;
//! // ... user authorizes, callback receives `code` ...
//! let token = provider.exchange_code(&code, None, &[]).await?;
//! let renewed = provider.refresh_token(token.refresh_token.as_deref().unwrap_or_default()).await?;
//! ```

use async_trait::async_trait;
use serde_json::Value;

use super::base::{BaseOAuth2Client, OAuth2Provider};
use super::scopes::default_scopes;
use super::{truncate_safe, OAuth2Config, OAuth2Token};
use crate::error::{HubSpotError, Result};

pub const AUTHORIZATION_URL: &str = "https://app.hubspot.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";
pub const TOKEN_INFO_URL: &str = "https://api.hubapi.com/oauth/v1/access-tokens";

pub const PROVIDER_ID: &str = "hubspot";

/// OAuth2 provider for HubSpot CRM
#[derive(Debug, Clone)]
pub struct HubSpotOAuth2Provider {
    base: BaseOAuth2Client,
    redirect_uri: Option<String>,
    token_info_url: String,
}

impl HubSpotOAuth2Provider {
    /// Provider against the production HubSpot endpoints.
    ///
    /// `scopes` are wire scopes; `None` requests contacts, companies and
    /// deals (read + write).
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Option<String>,
        scopes: Option<Vec<String>>,
    ) -> Result<Self> {
        let scopes = scopes.filter(|s| !s.is_empty()).unwrap_or_else(default_scopes);
        let config = OAuth2Config::new(TOKEN_URL, AUTHORIZATION_URL, client_id, client_secret, scopes);
        Self::with_config(config, redirect_uri)
    }

    /// Provider with an explicit config (custom endpoints or timeout)
    pub fn with_config(config: OAuth2Config, redirect_uri: Option<String>) -> Result<Self> {
        tracing::debug!("[OAuth2] HubSpot provider configured: {}", config.redacted());

        Ok(Self {
            base: BaseOAuth2Client::new(config)?,
            redirect_uri: redirect_uri.filter(|uri| !uri.is_empty()),
            token_info_url: TOKEN_INFO_URL.to_string(),
        })
    }

    /// Override the token introspection endpoint (the token is appended as a path segment)
    pub fn with_token_info_url(mut self, url: impl Into<String>) -> Self {
        self.token_info_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &OAuth2Config {
        self.base.config()
    }

    pub fn default_redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    // The per-call value wins; the configured default is the fallback.
    fn resolve_redirect_uri<'a>(&'a self, redirect_uri: Option<&'a str>, purpose: &str) -> Result<&'a str> {
        redirect_uri
            .filter(|uri| !uri.is_empty())
            .or(self.redirect_uri.as_deref())
            .ok_or_else(|| HubSpotError::config_error(format!("redirect_uri is required for {}", purpose)))
    }

    /// Fetch metadata about a live access token
    /// (`user`, `hub_id`, `scopes`, `expires_in`, ...).
    ///
    /// Anything other than HTTP 200 is an error carrying the status.
    pub async fn get_token_info(&self, access_token: &str) -> Result<Value> {
        let url = format!("{}/{}", self.token_info_url, urlencoding::encode(access_token));

        tracing::info!("🔍 [OAuth2] Fetching token info for {}...", truncate_safe(access_token, 8));

        let response = self.base.http_client().get(&url).send().await?;
        let status = response.status().as_u16();

        if status != 200 {
            tracing::warn!("❌ [OAuth2] Token info request failed: {}", status);
            return Err(HubSpotError::TokenInfo { status });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl OAuth2Provider for HubSpotOAuth2Provider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    fn get_authorization_url(
        &self,
        state: &str,
        redirect_uri: Option<&str>,
        scopes: Option<&[String]>,
        extra_params: &[(&str, &str)],
    ) -> Result<String> {
        let uri = self.resolve_redirect_uri(redirect_uri, "HubSpot authorization")?;
        self.base.authorization_url(state, uri, scopes, extra_params)
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
        extra_params: &[(&str, &str)],
    ) -> Result<OAuth2Token> {
        let uri = self.resolve_redirect_uri(redirect_uri, "token exchange")?;
        self.base.exchange_code(code, uri, extra_params).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token> {
        self.base.refresh_token(refresh_token).await
    }
}
