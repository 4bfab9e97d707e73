//! HubSpot CRM client
//!
//! This crate provides:
//!
//! - An OAuth2 provider for HubSpot (authorization URL, code exchange,
//!   refresh, token introspection) built on a reusable base client
//! - CRM tool handlers for contacts, companies and deals: search, get,
//!   create, update and associations
//!
//! # Authentication
//!
//! Tool handlers authenticate with the OAuth2 token stored under
//! `hubspot_oauth_token` in a [`CredentialStore`], falling back to an API key
//! (private app token). With neither available a call fails with
//! [`HubSpotError::MissingCredentials`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hubspot::{HubSpotTools, ObjectType};
//!
//! #[tokio::main]
//! async fn main() -> hubspot::Result<()> {
//!     let api_key = std::env::var("HUBSPOT_API_KEY").ok();
//!     let tools = HubSpotTools::new(None, api_key)?;
//!
//!     let found = tools.search(ObjectType::Contacts, "john", None, 10).await?;
//!     println!("{}", found);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod objects;
pub mod oauth;
pub mod tools;

pub use client::HubSpotClient;
pub use credentials::{CredentialStore, InMemoryCredentialStore, OAUTH_TOKEN_CREDENTIAL};
pub use error::{HubSpotError, Result};
pub use objects::ObjectType;
pub use oauth::{truncate_safe, BaseOAuth2Client, HubSpotOAuth2Provider, OAuth2Config, OAuth2Provider, OAuth2Token};
pub use tools::{HubSpotTools, ToolDefinition, TOOLS};
