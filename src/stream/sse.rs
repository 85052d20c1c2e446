use bytes::Bytes;
use serde::Serialize;

use crate::error::MockError;
use crate::protocol::StreamEvent;

const EVENT_PREFIX: &[u8] = b"event: ";
const DATA_PREFIX: &[u8] = b"data: ";

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

/// Frame a named SSE event: `event: {name}\ndata: {json}\n\n`.
///
/// The payload is serialized compactly, so `data` is always a single line.
///
/// # Errors
///
/// Returns [`MockError::Internal`] if the payload cannot be serialized.
pub fn named_sse_frame<T: Serialize + ?Sized>(
    event_type: &str,
    payload: &T,
) -> Result<Bytes, MockError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| MockError::Internal(format!("failed to encode {event_type} event: {e}")))?;
    let mut out =
        Vec::with_capacity(EVENT_PREFIX.len() + event_type.len() + DATA_PREFIX.len() + json.len() + 3);
    out.extend_from_slice(EVENT_PREFIX);
    out.extend_from_slice(event_type.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(DATA_PREFIX);
    out.extend_from_slice(&json);
    out.extend_from_slice(b"\n\n");
    Ok(Bytes::from(out))
}

/// Frame a protocol event under its own event name.
///
/// # Errors
///
/// See [`named_sse_frame`].
pub fn encode_stream_event(event: &StreamEvent) -> Result<Bytes, MockError> {
    named_sse_frame(event.event_name(), event)
}
