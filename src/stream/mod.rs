pub mod sse;

use std::time::Duration;

use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::error::MockError;
use crate::protocol::StreamEvent;

/// Adapt a lazy event iterator into a framed SSE byte stream.
///
/// Events are pulled and encoded only as the body is polled. With a `delay`,
/// every event after the first waits that long before it is produced.
pub fn sse_byte_stream<I>(
    events: I,
    delay: Option<Duration>,
) -> impl Stream<Item = Result<Bytes, MockError>> + Send + 'static
where
    I: Iterator<Item = StreamEvent> + Send + 'static,
{
    futures_util::stream::iter(events.enumerate()).then(move |(position, event)| async move {
        if let Some(delay) = delay.filter(|_| position > 0) {
            tokio::time::sleep(delay).await;
        }
        sse::encode_stream_event(&event)
    })
}

/// `200 OK` with the event-stream headers.
#[must_use]
pub fn sse_ok_response(body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = http::StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(
        http::header::CACHE_CONTROL,
        http::HeaderValue::from_static("no-cache"),
    );
    headers.insert(
        http::header::CONNECTION,
        http::HeaderValue::from_static("keep-alive"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<StreamEvent> {
        vec![
            StreamEvent::Error {
                message: "first".into(),
            },
            StreamEvent::MessageStop {},
        ]
    }

    #[tokio::test]
    async fn test_byte_stream_frames_in_order() {
        let frames: Vec<Bytes> = sse_byte_stream(events().into_iter(), None)
            .map(|frame| frame.unwrap())
            .collect()
            .await;
        assert_eq!(frames.len(), 2);
        assert!(frames[0].starts_with(b"event: error\n"));
        assert!(frames[1].starts_with(b"event: message_stop\n"));
    }

    #[tokio::test]
    async fn test_delay_applies_between_events() {
        let started = std::time::Instant::now();
        let frames: Vec<_> = sse_byte_stream(events().into_iter(), Some(Duration::from_millis(20)))
            .collect()
            .await;
        assert_eq!(frames.len(), 2);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_sse_headers() {
        let response = sse_ok_response(Body::empty());
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert_eq!(response.headers()[http::header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[http::header::CONNECTION], "keep-alive");
    }
}
