//! Error types for the hubspot crate

use thiserror::Error;

/// HubSpot client errors
///
/// CRM-side HTTP failures from the tool handlers are NOT represented here:
/// those come back in-band as `{"error": "..."}` values.
#[derive(Debug, Error)]
pub enum HubSpotError {
    /// HTTP transport failure, or a non-success status from the token endpoint
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Missing or invalid configuration (e.g. no redirect URI)
    #[error("{0}")]
    ConfigError(String),

    /// Neither an OAuth2 token nor an API key is available
    #[error("HubSpot credentials not found. Set HUBSPOT_API_KEY or configure OAuth2.")]
    MissingCredentials,

    /// Token introspection returned something other than 200
    #[error("Failed to get token info: {status}")]
    TokenInfo { status: u16 },

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed endpoint URL
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Tool dispatch received a name it does not know
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments could not be deserialized
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

impl HubSpotError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Default result type for the crate
pub type Result<T> = std::result::Result<T, HubSpotError>;
