use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Messages API request wire type.
///
/// Only `model` and `messages` drive the mock; everything else is accepted
/// and kept in `extra` so real client payloads deserialize unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub messages: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MessagesRequest {
    #[must_use]
    pub fn is_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    /// The most recent message authored by the user, if any.
    #[must_use]
    pub fn last_user_message(&self) -> Option<&InputMessage> {
        self.messages.iter().rev().find(|msg| msg.is_user())
    }
}

/// Message wire type. `content` is either a string or an array of blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl InputMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: serde_json::Value::String(content.into()),
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }

    /// Plain text of the message.
    ///
    /// Strings are returned as-is; block arrays contribute the `text` of every
    /// `type: "text"` block, concatenated. Anything else is empty.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match &self.content {
            serde_json::Value::String(text) => Cow::Borrowed(text.as_str()),
            serde_json::Value::Array(blocks) => {
                let mut texts = blocks.iter().filter_map(|block| {
                    if block.get("type").and_then(serde_json::Value::as_str) == Some("text") {
                        block.get("text").and_then(serde_json::Value::as_str)
                    } else {
                        None
                    }
                });
                match (texts.next(), texts.next()) {
                    (None, _) => Cow::Borrowed(""),
                    (Some(only), None) => Cow::Borrowed(only),
                    (Some(first), Some(second)) => {
                        let mut joined = String::with_capacity(first.len() + second.len());
                        joined.push_str(first);
                        joined.push_str(second);
                        for text in texts {
                            joined.push_str(text);
                        }
                        Cow::Owned(joined)
                    }
                }
            }
            _ => Cow::Borrowed(""),
        }
    }
}

/// Reason the mock stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
}

/// A content block in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Prompt-cache breakdown. Never populated by the mock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheCreation {
    pub ephemeral_1h_input_tokens: Option<u64>,
    pub ephemeral_5m_input_tokens: Option<u64>,
}

/// Token usage. The cache and service-tier fields are always `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation: CacheCreation,
    pub cache_creation_input_tokens: Option<u64>,
    pub cache_read_input_tokens: Option<u64>,
    pub server_tool_use: Option<serde_json::Value>,
    pub service_tier: Option<String>,
}

impl Usage {
    #[must_use]
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            ..Self::default()
        }
    }
}

/// Messages API response wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<StopReason>,
    pub stop_sequence: Option<String>,
    pub usage: Usage,
    pub container: Option<serde_json::Value>,
}

impl MessagesResponse {
    /// Concatenated text of all text blocks.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect()
    }
}
