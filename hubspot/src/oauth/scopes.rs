//! HubSpot OAuth2 scope catalog
//!
//! Symbolic names map to the wire scopes HubSpot expects in the `scope`
//! parameter. See <https://developers.hubspot.com/docs/api/oauth-quickstart-guide>.

/// Symbolic name → wire scope
pub const SCOPES: &[(&str, &str)] = &[
    ("contacts_read", "crm.objects.contacts.read"),
    ("contacts_write", "crm.objects.contacts.write"),
    ("companies_read", "crm.objects.companies.read"),
    ("companies_write", "crm.objects.companies.write"),
    ("deals_read", "crm.objects.deals.read"),
    ("deals_write", "crm.objects.deals.write"),
    ("tickets_read", "crm.objects.tickets.read"),
    ("tickets_write", "crm.objects.tickets.write"),
    ("line_items_read", "crm.objects.line_items.read"),
    ("line_items_write", "crm.objects.line_items.write"),
    ("quotes_read", "crm.objects.quotes.read"),
    ("quotes_write", "crm.objects.quotes.write"),
    ("owners_read", "crm.objects.owners.read"),
];

/// Requested when neither the caller nor the constructor names any scopes
pub const DEFAULT_SCOPES: &[&str] = &[
    "crm.objects.contacts.read",
    "crm.objects.contacts.write",
    "crm.objects.companies.read",
    "crm.objects.companies.write",
    "crm.objects.deals.read",
    "crm.objects.deals.write",
];

/// Look up the wire scope for a symbolic name
pub fn scope(name: &str) -> Option<&'static str> {
    SCOPES
        .iter()
        .find(|(symbolic, _)| *symbolic == name)
        .map(|(_, wire)| *wire)
}

/// Map symbolic names to wire scopes; anything unknown passes through as-is
pub fn resolve_scopes<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            scope(name).unwrap_or(name).to_string()
        })
        .collect()
}

pub fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}
