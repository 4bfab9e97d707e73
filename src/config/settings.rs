use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use hubspot::client::HUBSPOT_API_BASE;
use hubspot::oauth::hubspot::{AUTHORIZATION_URL, TOKEN_URL};
use hubspot::oauth::scopes::resolve_scopes;
use hubspot::{HubSpotOAuth2Provider, OAuth2Config};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hubspot: HubSpotSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HubSpotSettings {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    /// Private app token used when no OAuth2 token is stored
    #[serde(default)]
    pub api_key: Option<String>,
    /// Comma or space separated; symbolic names (`contacts_read`) or wire scopes
    #[serde(default)]
    pub scopes: Option<String>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

// Plain environment variables mapped onto config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HUBSPOT_CLIENT_ID", "hubspot.client_id"),
    ("HUBSPOT_CLIENT_SECRET", "hubspot.client_secret"),
    ("HUBSPOT_REDIRECT_URI", "hubspot.redirect_uri"),
    ("HUBSPOT_API_KEY", "hubspot.api_key"),
    ("HUBSPOT_SCOPES", "hubspot.scopes"),
    ("HUBSPOT_API_BASE_URL", "hubspot.api_base_url"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Base config file
            .add_source(File::with_name("config/default").required(false))
            // Per-environment file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        Self::build(builder, |key| std::env::var(key).ok())
    }

    fn build<F>(builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("hubspot.api_base_url", HUBSPOT_API_BASE)?
            .set_default("hubspot.request_timeout_secs", 30_i64)?;

        for (var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                builder = builder.set_override(*key, value)?;
            }
        }

        // Cloud Run style port injection
        if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder = builder.add_source(Environment::with_prefix("HUBSPOT_MIDDLEWARE").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl HubSpotSettings {
    /// Both client id and secret are present
    pub fn oauth_configured(&self) -> bool {
        non_empty(&self.client_id).is_some() && non_empty(&self.client_secret).is_some()
    }

    pub fn api_key_configured(&self) -> bool {
        non_empty(&self.api_key).is_some()
    }

    /// Requested scopes as wire scopes; `None` means the provider defaults
    pub fn scope_list(&self) -> Option<Vec<String>> {
        let names: Vec<&str> = self
            .scopes
            .as_deref()?
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(resolve_scopes(&names))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// OAuth2 provider, or `None` when the client credentials are missing
    pub fn oauth_provider(&self) -> hubspot::Result<Option<HubSpotOAuth2Provider>> {
        let (Some(client_id), Some(client_secret)) = (non_empty(&self.client_id), non_empty(&self.client_secret)) else {
            return Ok(None);
        };

        let scopes = self.scope_list().unwrap_or_else(hubspot::oauth::scopes::default_scopes);
        let config = OAuth2Config::new(TOKEN_URL, AUTHORIZATION_URL, client_id, client_secret, scopes)
            .with_request_timeout(self.request_timeout());

        HubSpotOAuth2Provider::with_config(config, self.redirect_uri.clone()).map(Some)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
