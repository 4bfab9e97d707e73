//! Provider-agnostic OAuth2 plumbing
//!
//! [`BaseOAuth2Client`] knows how to encode an authorization URL and how to
//! talk to a token endpoint with the authorization-code and refresh-token
//! grants. Concrete providers compose it and expose the [`OAuth2Provider`]
//! capability.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{truncate_safe, OAuth2Config, OAuth2Token};
use crate::error::{HubSpotError, Result};

/// Token lifecycle operations every provider supports
#[async_trait]
pub trait OAuth2Provider: Send + Sync {
    /// Short identifier, e.g. `"hubspot"`
    fn provider_id(&self) -> &str;

    /// Build the URL the user is redirected to for consent
    fn get_authorization_url(
        &self,
        state: &str,
        redirect_uri: Option<&str>,
        scopes: Option<&[String]>,
        extra_params: &[(&str, &str)],
    ) -> Result<String>;

    /// Authorization-code grant
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
        extra_params: &[(&str, &str)],
    ) -> Result<OAuth2Token>;

    /// Refresh-token grant
    async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token>;
}

/// Shared authorization-code / refresh-token client
#[derive(Debug, Clone)]
pub struct BaseOAuth2Client {
    config: OAuth2Config,
    http_client: Client,
}

impl BaseOAuth2Client {
    /// Creates the client; the HTTP timeout comes from `config.request_timeout`
    pub fn new(config: OAuth2Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| HubSpotError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Encode the authorization URL.
    ///
    /// Parameter order: `client_id`, `redirect_uri`, `response_type`, `scope`,
    /// `state`, then `extra_params` as given.
    pub fn authorization_url(
        &self,
        state: &str,
        redirect_uri: &str,
        scopes: Option<&[String]>,
        extra_params: &[(&str, &str)],
    ) -> Result<String> {
        let scopes = scopes.unwrap_or(&self.config.default_scopes);
        let mut url = Url::parse(&self.config.authorization_url)?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", redirect_uri);
            query.append_pair("response_type", "code");
            query.append_pair("scope", &scopes.join(" "));
            query.append_pair("state", state);
            for (key, value) in extra_params {
                query.append_pair(key, value);
            }
        }

        Ok(url.to_string())
    }

    /// Exchange an authorization code for a token pair
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<OAuth2Token> {
        tracing::info!("🔐 [OAuth2] Exchanging authorization code {}...", truncate_safe(code, 8));

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        form.extend_from_slice(extra_params);

        self.request_token(&form).await
    }

    /// Obtain a new access token from a refresh token.
    ///
    /// When the server does not rotate the refresh token, the one that was
    /// sent is carried over into the result.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token> {
        tracing::info!("🔄 [OAuth2] Refreshing access token...");

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        let mut token = self.request_token(&form).await?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    // Non-2xx responses surface as the reqwest status error, untranslated.
    async fn request_token(&self, form: &[(&str, &str)]) -> Result<OAuth2Token> {
        tracing::debug!("POST {}", self.config.token_url);

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let token = OAuth2Token::from_response(body)?;

        tracing::info!(
            "✅ [OAuth2] Access token obtained: {}... (expires_in: {:?})",
            truncate_safe(&token.access_token, 8),
            token.expires_in
        );

        Ok(token)
    }
}
