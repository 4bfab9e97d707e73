//! Credential lookup for the CRM tool handlers

use std::collections::HashMap;
use std::sync::RwLock;

/// Name under which the OAuth2 access token is stored
pub const OAUTH_TOKEN_CREDENTIAL: &str = "hubspot_oauth_token";

/// Supplies previously obtained secrets by name
pub trait CredentialStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Process-local credential store
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.into(), value.into());
        }
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.values.write().ok().and_then(|mut values| values.remove(name))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(name).cloned())
            .filter(|value| !value.is_empty())
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}
