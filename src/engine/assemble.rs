use crate::catalog::TestCase;
use crate::protocol::{ContentBlock, MessagesResponse, StopReason, Usage};

use super::usage::estimate_tokens;

/// Build the complete non-streaming response for a validated request.
#[must_use]
pub fn assemble_response(
    message_id: String,
    model: &str,
    test_case: &TestCase,
    input_tokens: u64,
) -> MessagesResponse {
    let output_tokens = estimate_tokens(&test_case.response);
    MessagesResponse {
        id: message_id,
        type_: "message".to_string(),
        role: "assistant".to_string(),
        content: vec![ContentBlock::Text {
            text: test_case.response.clone(),
        }],
        model: model.to_string(),
        stop_reason: Some(StopReason::EndTurn),
        stop_sequence: None,
        usage: Usage::new(input_tokens, output_tokens),
        container: None,
    }
}

/// Response envelope announced by `message_start`: no content, no stop
/// reason, zero usage.
#[must_use]
pub fn skeleton_response(message_id: String, model: &str) -> MessagesResponse {
    MessagesResponse {
        id: message_id,
        type_: "message".to_string(),
        role: "assistant".to_string(),
        content: Vec::new(),
        model: model.to_string(),
        stop_reason: None,
        stop_sequence: None,
        usage: Usage::default(),
        container: None,
    }
}
