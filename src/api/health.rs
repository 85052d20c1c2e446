use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Health check handler.
/// Returns JSON with status and config summary. Never authenticated.
pub fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = &state.config;
    let catalog = state.engine.catalog();
    let models: Vec<Value> = catalog
        .iter()
        .map(|model| {
            json!({
                "id": model.id(),
                "kind": model.kind().to_string(),
                "description": model.description(),
            })
        })
        .collect();
    Json(json!({
        "status": "mock-messages is running",
        "config": {
            "models_count": catalog.len(),
            "models": models,
            "client_authentication_enabled": state.auth_enabled(),
            "stream_event_delay_ms": config.server.stream_event_delay_ms,
            "features": {
                "log_level": config.features.log_level,
            }
        }
    }))
}
