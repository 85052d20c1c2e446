use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};

use crate::error::{into_axum_response, MockError};
use crate::observability::log_request_complete;
use crate::protocol::{MessagesRequest, StreamEvent};
use crate::state::AppState;
use crate::stream::{sse_byte_stream, sse_ok_response};

/// `POST /v1/messages`: JSON response, or an SSE body when `"stream": true`.
pub fn handler(State(state): State<Arc<AppState>>, headers: &HeaderMap, body: &[u8]) -> Response {
    if let Err(err) = state.authenticate(headers) {
        return into_axum_response(&err);
    }

    let request: MessagesRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            let err = MockError::InvalidRequest(format!("Invalid JSON body: {e}"));
            tracing::debug!(error = %err, "rejected messages request");
            return into_axum_response(&err);
        }
    };

    if request.is_stream() {
        stream_response(&state, &request)
    } else {
        json_response(&state, &request)
    }
}

fn json_response(state: &AppState, request: &MessagesRequest) -> Response {
    let start = Instant::now();
    match state.engine.create_message(request) {
        Ok(response) => {
            log_request_complete(
                &response.model,
                response.usage.input_tokens,
                response.usage.output_tokens,
                false,
                start,
            );
            Json(response).into_response()
        }
        Err(err) => into_axum_response(&err),
    }
}

fn stream_response(state: &AppState, request: &MessagesRequest) -> Response {
    let start = Instant::now();
    let events = state.engine.create_message_stream(request);
    let input_tokens = events.input_tokens();
    let model = request.model.clone();

    // usage is final once message_delta is produced
    let events = events.inspect(move |event| {
        if let StreamEvent::MessageDelta { usage, .. } = event {
            log_request_complete(&model, input_tokens, usage.output_tokens, true, start);
        }
    });

    let body = Body::from_stream(sse_byte_stream(events, state.stream_event_delay()));
    sse_ok_response(body)
}
