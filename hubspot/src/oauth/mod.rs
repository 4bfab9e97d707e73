//! # HubSpot OAuth2
//!
//! - `config.rs`: immutable [`OAuth2Config`]
//! - `token.rs`: [`OAuth2Token`] parsed from the token endpoint
//! - `base.rs`: [`OAuth2Provider`] capability and the shared [`BaseOAuth2Client`]
//! - `scopes.rs`: HubSpot scope catalog
//! - `hubspot.rs`: [`HubSpotOAuth2Provider`]

pub mod base;
pub mod config;
pub mod hubspot;
pub mod scopes;
pub mod token;

pub use base::{BaseOAuth2Client, OAuth2Provider};
pub use config::OAuth2Config;
pub use hubspot::HubSpotOAuth2Provider;
pub use token::OAuth2Token;

/// Returns at most `max_bytes` bytes of `s`, backing off to the previous
/// character boundary so multi-byte characters are never split. Used to
/// show only a prefix of secrets in log lines.
///
/// ```
/// use hubspot::truncate_safe;
///
/// assert_eq!(truncate_safe("pat-na1-ééé", 9), "pat-na1-");
/// ```
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}
