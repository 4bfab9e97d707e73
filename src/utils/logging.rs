use tracing::{debug, error, info, warn};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

/// `outcome` is `"ok"` or `"tool_error"`, see [`tool_outcome`]
pub fn log_request_processed(endpoint: &str, outcome: &str, duration_ms: u64) {
    match outcome {
        "ok" => info!("Request processed: {} - Outcome: {} - Duration: {}ms", endpoint, outcome, duration_ms),
        _ => warn!("Request processed: {} - Outcome: {} - Duration: {}ms", endpoint, outcome, duration_ms),
    }
}

/// Tool calls answer HTTP 200 either way; the body decides the outcome
pub fn tool_outcome(error: Option<&str>) -> &'static str {
    match error {
        Some(_) => "tool_error",
        None => "ok",
    }
}

pub fn log_tool_call(tool: &str) {
    info!("🔧 Tool call: {}", tool);
}

/// In-band `{"error": ...}` results are logged as warnings
pub fn log_tool_result(tool: &str, error: Option<&str>) {
    match error {
        Some(message) => warn!("Tool {} returned error: {}", tool, message),
        None => info!("✅ Tool {} completed", tool),
    }
}

pub fn log_hubspot_api_error(operation: &str, error: &str) {
    error!("HubSpot API error: {} - Error: {}", operation, error);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 HubSpot CRM middleware server starting on port {}", port);
}

pub fn log_server_ready(addr: &str) {
    info!("✅ Server ready and listening on http://{}", addr);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_integration_status_check() {
    debug!("Integration status check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
