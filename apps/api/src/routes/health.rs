use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Prompt-to-JSON Enhancer API is running!" }))
}

/// GET /health
/// Probes the upstream model API. An unreachable upstream reports `degraded`,
/// since enhancement still works through the fallback path.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let connected = state.enhancer.test_connection().await;
    if !connected {
        tracing::warn!("Upstream '{}' unreachable", state.enhancer.backend_name());
    }

    let (status, upstream) = if connected {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };

    Json(json!({
        "status": status,
        "upstream_api": upstream,
        "backend": state.enhancer.backend_name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
