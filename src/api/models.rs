use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};

use crate::error::into_axum_response;
use crate::state::AppState;

/// `GET /v1/models`: every catalog model in configured order.
#[must_use]
pub fn list_handler(State(state): State<Arc<AppState>>, headers: &HeaderMap) -> Response {
    if let Err(err) = state.authenticate(headers) {
        return into_axum_response(&err);
    }
    Json(state.engine.list_models()).into_response()
}

/// `GET /v1/models/{id}`.
#[must_use]
pub fn retrieve_handler(
    State(state): State<Arc<AppState>>,
    headers: &HeaderMap,
    model_id: &str,
) -> Response {
    if let Err(err) = state.authenticate(headers) {
        return into_axum_response(&err);
    }
    match state.engine.get_model(model_id) {
        Ok(model) => Json(model).into_response(),
        Err(err) => into_axum_response(&err),
    }
}
