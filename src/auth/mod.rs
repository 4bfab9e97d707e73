//! # HubSpot OAuth2 Authentication Module
//!
//! ## Responsibilities:
//! - Start the authorization flow (random `state`, redirect)
//! - Exchange the callback code for a token
//! - Keep the token fresh and publish it to the credential store
//!
//! ## Structure:
//! - `token_manager.rs`: token storage, refresh, state bookkeeping
//! - `handlers.rs`: HTTP handlers (start, callback, token info, refresh)

pub mod handlers;
pub mod token_manager;

pub use handlers::{get_token_info, handle_oauth_callback, refresh_token, start_oauth_flow};
pub use token_manager::TokenManager;
