//! UTF-8 safe string truncation and HTML escaping for log lines and pages

pub use hubspot::truncate_safe;

/// [`truncate_safe`] plus `suffix` when something was cut off
pub fn truncate_with_suffix(s: &str, max_bytes: usize, suffix: &str) -> String {
    let truncated = truncate_safe(s, max_bytes);
    if truncated.len() < s.len() {
        format!("{}{}", truncated, suffix)
    } else {
        truncated.to_string()
    }
}

/// Escapes text for interpolation into HTML element content or attributes
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
