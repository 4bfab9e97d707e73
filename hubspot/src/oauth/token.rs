//! OAuth2 token as returned by the token endpoint

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Token pair produced by a code exchange or a refresh
///
/// Storage is the caller's responsibility; the provider never keeps one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Token {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Lifetime in seconds, as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Space-separated granted scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Computed locally from `expires_in` when the token is received
    #[serde(skip)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuth2Token {
    /// Parse a token endpoint response body, stamping `expires_at`
    pub fn from_response(body: serde_json::Value) -> serde_json::Result<Self> {
        let mut token: OAuth2Token = serde_json::from_value(body)?;
        token.expires_at = token
            .expires_in
            .map(|secs| Utc::now() + ChronoDuration::seconds(secs as i64));
        Ok(token)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::ZERO)
    }

    /// True when the token expires within `margin` from now.
    /// Tokens without a known expiry never report as expiring.
    pub fn expires_within(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let margin = ChronoDuration::from_std(margin).unwrap_or(ChronoDuration::zero());
                Utc::now() + margin >= expires_at
            }
            None => false,
        }
    }

    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_keeps_fields() {
        let token = OAuth2Token::from_response(json!({
            "access_token": "T",
            "refresh_token": "R",
            "expires_in": 3600
        }))
        .unwrap();

        assert_eq!(token.access_token, "T");
        assert_eq!(token.refresh_token.as_deref(), Some("R"));
        assert_eq!(token.expires_in, Some(3600));
        assert_eq!(token.scope, None);
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_at.is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_expires_within_margin() {
        let token = OAuth2Token::from_response(json!({
            "access_token": "T",
            "expires_in": 30
        }))
        .unwrap();

        assert!(!token.is_expired());
        assert!(token.expires_within(Duration::from_secs(60)));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let token = OAuth2Token::from_response(json!({ "access_token": "T" })).unwrap();
        assert!(!token.expires_within(Duration::from_secs(86_400)));
    }

    #[test]
    fn test_scopes_split() {
        let token = OAuth2Token::from_response(json!({
            "access_token": "T",
            "scope": "crm.objects.contacts.read crm.objects.deals.write"
        }))
        .unwrap();
        assert_eq!(
            token.scopes(),
            vec!["crm.objects.contacts.read", "crm.objects.deals.write"]
        );
        assert_eq!(token.authorization_header(), "Bearer T");
    }

    #[test]
    fn test_missing_access_token_fails() {
        assert!(OAuth2Token::from_response(json!({ "refresh_token": "R" })).is_err());
    }
}
