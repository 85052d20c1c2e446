pub mod messages;
pub mod models;
pub mod stream;

use serde::{Deserialize, Serialize};

pub use messages::{
    CacheCreation, ContentBlock, InputMessage, MessagesRequest, MessagesResponse, StopReason,
    Usage,
};
pub use models::{ModelInfo, ModelsResponse};
pub use stream::{ContentDelta, MessageDeltaBody, MessageDeltaUsage, StreamEvent};

/// Error payload returned by every entry point: `{"type":"error","message":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            type_: "error".to_string(),
            message: message.into(),
        }
    }
}
