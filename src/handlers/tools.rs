use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;

use hubspot::TOOLS;

use crate::utils::logging::*;
use crate::utils::AppResult;
use crate::AppState;

/// GET /tools
pub async fn list_tools() -> Json<Value> {
    Json(json!({
        "count": TOOLS.len(),
        "tools": TOOLS,
    }))
}

/// POST /tools/:name
///
/// Body is the tool's JSON arguments. HubSpot-side failures come back as
/// 200 with `{"error": ...}`.
pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> AppResult<Json<Value>> {
    let start_time = Instant::now();
    let endpoint = format!("/tools/{}", name);
    log_request_received(&endpoint, "POST");
    log_tool_call(&name);

    if let Some(manager) = &state.token_manager {
        // A failed refresh still leaves the API key path open
        if let Err(e) = manager.ensure_fresh().await {
            log_warning(&format!("⚠️ Token refresh before {} failed: {}", name, e));
        }
    }

    let result = state.tools.call(&name, args).await.map_err(|e| {
        log_error(&format!("❌ Tool {} failed: {}", name, e));
        e
    })?;

    let error = result.get("error").and_then(Value::as_str);
    log_tool_result(&name, error);
    log_request_processed(&endpoint, tool_outcome(error), start_time.elapsed().as_millis() as u64);

    Ok(Json(result))
}
