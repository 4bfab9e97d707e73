//! Authenticated HTTP client for the HubSpot CRM API

use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::credentials::{CredentialStore, OAUTH_TOKEN_CREDENTIAL};
use crate::error::{HubSpotError, Result};

pub const HUBSPOT_API_BASE: &str = "https://api.hubapi.com";

/// Client for HubSpot's REST API
///
/// Authentication is resolved on every request: the OAuth2 token from the
/// credential store first, then the configured API key.
#[derive(Clone)]
pub struct HubSpotClient {
    http_client: HttpClient,
    base_url: String,
    credentials: Option<Arc<dyn CredentialStore>>,
    api_key: Option<String>,
}

impl fmt::Debug for HubSpotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSpotClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials.as_ref().map(|_| "<store>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HubSpotClient {
    /// Creates a new client
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(credentials: Option<Arc<dyn CredentialStore>>, api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(HUBSPOT_API_BASE, credentials, api_key)
    }

    /// Same as [`HubSpotClient::new`] against another API host
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Option<Arc<dyn CredentialStore>>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HubSpotError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token to send: OAuth2 token, else API key, else error
    pub fn bearer_token(&self) -> Result<String> {
        if let Some(token) = self
            .credentials
            .as_ref()
            .and_then(|store| store.get(OAUTH_TOKEN_CREDENTIAL))
        {
            return Ok(token);
        }

        if let Some(api_key) = &self.api_key {
            return Ok(api_key.clone());
        }

        Err(HubSpotError::MissingCredentials)
    }

    /// Sends an authenticated request.
    ///
    /// HTTP failures come back as `Ok({"error": ...})`; only missing
    /// credentials and transport failures are `Err`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        params: Option<&[(&str, String)]>,
    ) -> Result<Value> {
        let token = self.bearer_token()?;
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();

        if let Some(message) = error_message(status) {
            tracing::warn!("HubSpot API error: {} - Status: {}", endpoint, status.as_u16());
            return Ok(json!({ "error": message }));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get(&self, endpoint: &str, params: Option<&[(&str, String)]>) -> Result<Value> {
        self.request(Method::GET, endpoint, None, params).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, endpoint, Some(body), None).await
    }

    pub async fn patch(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.request(Method::PATCH, endpoint, Some(body), None).await
    }
}

/// In-band message for a failed HTTP status, `None` for success
pub fn error_message(status: StatusCode) -> Option<String> {
    match status.as_u16() {
        401 => Some("Invalid or expired HubSpot credentials".to_string()),
        403 => Some("Access forbidden. Check API permissions.".to_string()),
        429 => Some("Rate limit exceeded. Try again later.".to_string()),
        code if code >= 400 => Some(format!("HubSpot API error: HTTP {}", code)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::InMemoryCredentialStore;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;

    fn store_with_token(token: &str) -> Arc<dyn CredentialStore> {
        let store = InMemoryCredentialStore::new();
        store.set(OAUTH_TOKEN_CREDENTIAL, token);
        Arc::new(store)
    }

    #[test]
    fn test_error_message_mapping() {
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED).as_deref(),
            Some("Invalid or expired HubSpot credentials")
        );
        assert_eq!(
            error_message(StatusCode::FORBIDDEN).as_deref(),
            Some("Access forbidden. Check API permissions.")
        );
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS).as_deref(),
            Some("Rate limit exceeded. Try again later.")
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND).as_deref(),
            Some("HubSpot API error: HTTP 404")
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY).as_deref(),
            Some("HubSpot API error: HTTP 502")
        );
        assert_eq!(error_message(StatusCode::OK), None);
        assert_eq!(error_message(StatusCode::CREATED), None);
    }

    #[test]
    fn test_oauth_token_preferred_over_api_key() {
        let client = HubSpotClient::new(Some(store_with_token("oauth-token")), Some("api-key".to_string())).unwrap();
        assert_eq!(client.bearer_token().unwrap(), "oauth-token");
    }

    #[test]
    fn test_api_key_fallback() {
        let empty: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
        let client = HubSpotClient::new(Some(empty), Some("api-key".to_string())).unwrap();
        assert_eq!(client.bearer_token().unwrap(), "api-key");

        let client = HubSpotClient::new(None, Some("api-key".to_string())).unwrap();
        assert_eq!(client.bearer_token().unwrap(), "api-key");
    }

    #[test]
    fn test_missing_credentials() {
        let client = HubSpotClient::new(None, Some(String::new())).unwrap();
        assert!(matches!(client.bearer_token(), Err(HubSpotError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_request_sends_bearer_and_returns_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/crm/v3/objects/contacts/1")
                    .header("Authorization", "Bearer oauth-token");
                then.status(200).json_body(serde_json::json!({ "id": "1" }));
            })
            .await;

        let client = HubSpotClient::with_base_url(server.base_url(), Some(store_with_token("oauth-token")), None).unwrap();
        let result = client.get("/crm/v3/objects/contacts/1", None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, serde_json::json!({ "id": "1" }));
    }

    #[tokio::test]
    async fn test_missing_credentials_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.path("/crm/v3/objects/contacts/1");
                then.status(200);
            })
            .await;

        let client = HubSpotClient::with_base_url(server.base_url(), None, None).unwrap();
        let result = client.get("/crm/v3/objects/contacts/1", None).await;

        assert!(matches!(result, Err(HubSpotError::MissingCredentials)));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/crm/v3/objects/deals/9");
                then.status(204);
            })
            .await;

        let client = HubSpotClient::with_base_url(server.base_url(), None, Some("k".to_string())).unwrap();
        let result = client.patch("/crm/v3/objects/deals/9", &serde_json::json!({})).await.unwrap();
        assert_eq!(result, serde_json::json!({}));
    }
}
