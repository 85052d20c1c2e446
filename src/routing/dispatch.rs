use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{self, Body};
use axum::extract::State;
use axum::http::{Method, Request};
use axum::response::{IntoResponse, Response};

use crate::api::{health, messages, models};
use crate::error::{into_axum_response, MockError};
use crate::state::AppState;

#[derive(Debug, PartialEq, Eq)]
enum RouteMatch<'a> {
    Health,
    ListModels,
    GetModel { model_id: &'a str },
    Messages,
    MethodNotAllowed,
    NotFound,
}

/// Dispatch a raw HTTP request to the matching handler.
///
/// # Errors
///
/// This function currently never returns `Err` and uses `Infallible`.
pub async fn dispatch_request(
    state: Arc<AppState>,
    base_path: Arc<str>,
    request: Request<Body>,
) -> Result<Response, Infallible> {
    let (parts, body) = request.into_parts();
    let route = match_route(&parts.method, parts.uri.path(), base_path.as_ref());

    let response = match route {
        RouteMatch::Health => health::health_handler(State(state)).into_response(),
        RouteMatch::ListModels => models::list_handler(State(state), &parts.headers),
        RouteMatch::GetModel { model_id } => {
            models::retrieve_handler(State(state), &parts.headers, model_id)
        }
        RouteMatch::Messages => {
            let limit = state.config.server.max_body_bytes;
            let body_bytes = match read_request_body(body, limit).await {
                Ok(bytes) => bytes,
                Err(response) => return Ok(response),
            };
            messages::handler(State(state), &parts.headers, &body_bytes)
        }
        RouteMatch::MethodNotAllowed => into_axum_response(&MockError::MethodNotAllowed(
            format!("{} {}", parts.method, parts.uri.path()),
        )),
        RouteMatch::NotFound => {
            into_axum_response(&MockError::NotFound(parts.uri.path().to_string()))
        }
    };

    Ok(response)
}

#[must_use]
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim();
    if trimmed.is_empty() || trimmed == "/" {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.trim_end_matches('/').to_string()
    } else {
        format!("/{}", trimmed.trim_end_matches('/'))
    }
}

async fn read_request_body(body: Body, limit: usize) -> Result<bytes::Bytes, Response> {
    body::to_bytes(body, limit)
        .await
        .map_err(|_| into_axum_response(&MockError::PayloadTooLarge(limit)))
}

fn match_route<'a>(method: &Method, path: &'a str, base_path: &str) -> RouteMatch<'a> {
    let Some(path) = strip_base_path(path, base_path) else {
        return RouteMatch::NotFound;
    };

    let (route, allowed) = match path {
        "/" => (RouteMatch::Health, Method::GET),
        "/v1/models" => (RouteMatch::ListModels, Method::GET),
        "/v1/messages" => (RouteMatch::Messages, Method::POST),
        _ => match path.strip_prefix("/v1/models/") {
            Some(model_id) if !model_id.is_empty() && !model_id.contains('/') => {
                (RouteMatch::GetModel { model_id }, Method::GET)
            }
            _ => return RouteMatch::NotFound,
        },
    };

    if method == allowed {
        route
    } else {
        RouteMatch::MethodNotAllowed
    }
}

fn strip_base_path<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
    if base_path.is_empty() {
        return Some(path);
    }

    let remainder = path.strip_prefix(base_path)?;
    if remainder.is_empty() {
        Some("/")
    } else if remainder.starts_with('/') {
        Some(remainder)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("mock/"), "/mock");
        assert_eq!(normalize_base_path(" /a/b/ "), "/a/b");
    }

    #[test]
    fn test_match_route_table() {
        assert_eq!(match_route(&Method::GET, "/", ""), RouteMatch::Health);
        assert_eq!(match_route(&Method::GET, "/v1/models", ""), RouteMatch::ListModels);
        assert_eq!(
            match_route(&Method::GET, "/v1/models/mock-claude-text", ""),
            RouteMatch::GetModel {
                model_id: "mock-claude-text"
            }
        );
        assert_eq!(match_route(&Method::POST, "/v1/messages", ""), RouteMatch::Messages);
        assert_eq!(
            match_route(&Method::GET, "/v1/messages", ""),
            RouteMatch::MethodNotAllowed
        );
        assert_eq!(match_route(&Method::GET, "/v1/models/", ""), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/v1/models/a/b", ""), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/nope", ""), RouteMatch::NotFound);
    }

    #[test]
    fn test_match_route_with_base_path() {
        assert_eq!(match_route(&Method::GET, "/mock", "/mock"), RouteMatch::Health);
        assert_eq!(
            match_route(&Method::POST, "/mock/v1/messages", "/mock"),
            RouteMatch::Messages
        );
        assert_eq!(match_route(&Method::POST, "/v1/messages", "/mock"), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/mockery", "/mock"), RouteMatch::NotFound);
    }
}
