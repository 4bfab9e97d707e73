//! OAuth2 Configuration

use std::time::Duration;

/// Default timeout for token endpoint calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable OAuth2 settings for one provider instance
#[derive(Debug, Clone, PartialEq)]
pub struct OAuth2Config {
    /// Token endpoint (code exchange and refresh)
    pub token_url: String,

    /// User-facing authorization endpoint
    pub authorization_url: String,

    pub client_id: String,

    pub client_secret: String,

    /// Scopes requested when the caller does not pass any
    pub default_scopes: Vec<String>,

    /// Timeout applied to every call made with this config
    pub request_timeout: Duration,
}

impl OAuth2Config {
    pub fn new(
        token_url: impl Into<String>,
        authorization_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        default_scopes: Vec<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            authorization_url: authorization_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            default_scopes,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Log-safe summary; never includes the client secret
    pub fn redacted(&self) -> String {
        format!(
            "OAuth2Config {{ token_url: {}, authorization_url: {}, client_id: {}, scopes: {} }}",
            self.token_url,
            self.authorization_url,
            self.client_id,
            self.default_scopes.len()
        )
    }
}
