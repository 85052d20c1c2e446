use crate::protocol::ErrorResponse;

/// Error type shared by the engine and the HTTP surface.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Model '{0}' does not exist")]
    ModelNotFound(String),
    #[error("No user message found")]
    NoUserMessage,
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("Request body too large (max {0} bytes)")]
    PayloadTooLarge(usize),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Broad error category for status code selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidRequest,
    Authentication,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    ServerError,
}

impl MockError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            MockError::NoUserMessage | MockError::InvalidRequest(_) => {
                ErrorCategory::InvalidRequest
            }
            MockError::Auth(_) => ErrorCategory::Authentication,
            MockError::ModelNotFound(_) | MockError::NotFound(_) => ErrorCategory::NotFound,
            MockError::MethodNotAllowed(_) => ErrorCategory::MethodNotAllowed,
            MockError::PayloadTooLarge(_) => ErrorCategory::PayloadTooLarge,
            MockError::Internal(_) => ErrorCategory::ServerError,
        }
    }
}

// ---------------------------------------------------------------------------
// Category -> HTTP status code
// ---------------------------------------------------------------------------

#[must_use]
pub fn http_status_for_category(cat: ErrorCategory) -> http::StatusCode {
    match cat {
        ErrorCategory::InvalidRequest => http::StatusCode::BAD_REQUEST,
        ErrorCategory::Authentication => http::StatusCode::UNAUTHORIZED,
        ErrorCategory::NotFound => http::StatusCode::NOT_FOUND,
        ErrorCategory::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
        ErrorCategory::PayloadTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCategory::ServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ---------------------------------------------------------------------------
// Error payload construction
// ---------------------------------------------------------------------------

/// Build the wire error payload for any error.
///
/// Every entry point (non-streaming body, streaming `error` event, ambient
/// HTTP failures) goes through here so the message text is identical.
#[must_use]
pub fn error_response(err: &MockError) -> ErrorResponse {
    ErrorResponse::new(err.to_string())
}

/// Format an error, returning (`status_code`, payload).
#[must_use]
pub fn format_error(err: &MockError) -> (http::StatusCode, ErrorResponse) {
    (
        http_status_for_category(err.category()),
        error_response(err),
    )
}

// ---------------------------------------------------------------------------
// Axum integration
// ---------------------------------------------------------------------------

#[must_use]
pub fn into_axum_response(err: &MockError) -> axum::response::Response {
    use axum::response::IntoResponse;
    let (status, body) = format_error(err);
    (status, axum::Json(body)).into_response()
}

impl axum::response::IntoResponse for MockError {
    fn into_response(self) -> axum::response::Response {
        into_axum_response(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_exact() {
        assert_eq!(
            MockError::ModelNotFound("m9".into()).to_string(),
            "Model 'm9' does not exist"
        );
        assert_eq!(MockError::NoUserMessage.to_string(), "No user message found");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MockError::ModelNotFound("x".into()), 404),
            (MockError::NoUserMessage, 400),
            (MockError::Auth("Missing API key".into()), 401),
            (MockError::InvalidRequest("bad json".into()), 400),
            (MockError::NotFound("/nope".into()), 404),
            (MockError::MethodNotAllowed("GET /v1/messages".into()), 405),
            (MockError::PayloadTooLarge(16), 413),
            (MockError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            let (code, _) = format_error(&err);
            assert_eq!(code.as_u16(), status, "status for {err:?}");
        }
    }

    #[test]
    fn test_error_response_shape() {
        let payload = error_response(&MockError::NoUserMessage);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "error", "message": "No user message found"})
        );
    }
}
