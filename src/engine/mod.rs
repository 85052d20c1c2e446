//! Response synthesis: validation, usage estimation, assembly and stream
//! sequencing over an immutable [`ModelCatalog`].

pub mod assemble;
mod ids;
pub mod sequence;
pub mod usage;
pub mod validate;

use std::sync::Arc;

use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::error::{error_response, MockError};
use crate::protocol::{MessagesRequest, MessagesResponse, ModelInfo, ModelsResponse};

pub use assemble::{assemble_response, skeleton_response};
pub use sequence::{next_word_pair, word_pairs, MessageStream};
pub use usage::estimate_tokens;
pub use validate::{validate_request, ValidatedRequest};

use ids::MessageIdGenerator;

/// Entry point for both the listing and the messages operations.
///
/// Stateless per call apart from the message-id counter, so one instance is
/// shared by every request.
pub struct MessageEngine {
    catalog: Arc<ModelCatalog>,
    ids: MessageIdGenerator,
}

impl MessageEngine {
    #[must_use]
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self {
            catalog,
            ids: MessageIdGenerator::new(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Every catalog model, in configured order.
    #[must_use]
    pub fn list_models(&self) -> ModelsResponse {
        ModelsResponse::from_models(self.catalog.iter().map(|m| model_info(m)).collect())
    }

    /// # Errors
    ///
    /// Returns [`MockError::ModelNotFound`] for an unknown id.
    pub fn get_model(&self, model_id: &str) -> Result<ModelInfo, MockError> {
        self.catalog
            .lookup(model_id)
            .map(|m| model_info(m))
            .ok_or_else(|| MockError::ModelNotFound(model_id.to_string()))
    }

    /// Answer a non-streaming request with the selected test case.
    ///
    /// # Errors
    ///
    /// Returns the validation error when the model is unknown or the request
    /// has no user message.
    pub fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse, MockError> {
        let validated = validate_request(&self.catalog, request).inspect_err(log_rejection)?;
        let input_tokens = estimate_tokens(&validated.user_text);
        Ok(assemble_response(
            self.ids.next_message_id(),
            validated.model.id(),
            validated.test_case,
            input_tokens,
        ))
    }

    /// Answer a streaming request. Never fails: a validation error becomes a
    /// stream holding a single `error` event.
    #[must_use]
    pub fn create_message_stream(&self, request: &MessagesRequest) -> MessageStream {
        match validate_request(&self.catalog, request) {
            Ok(validated) => MessageStream::scripted(
                self.ids.next_message_id(),
                validated.model.id(),
                Arc::clone(validated.test_case),
                estimate_tokens(&validated.user_text),
            ),
            Err(err) => {
                log_rejection(&err);
                MessageStream::rejected(error_response(&err).message)
            }
        }
    }
}

fn model_info(model: &ModelDescriptor) -> ModelInfo {
    ModelInfo {
        id: model.id().to_string(),
        type_: "model".to_string(),
        created_at: model.created_at().to_string(),
        display_name: model.display_name().to_string(),
    }
}

fn log_rejection(err: &MockError) {
    tracing::debug!(error = %err, "request rejected by validation");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModelKind, ModelSpec, TestCase};
    use crate::protocol::{InputMessage, StreamEvent};

    fn engine(specs: Vec<ModelSpec>) -> MessageEngine {
        MessageEngine::new(Arc::new(ModelCatalog::from_specs(specs).unwrap()))
    }

    fn spec(id: &str, response: &str) -> ModelSpec {
        ModelSpec {
            id: id.into(),
            name: format!("{id} display"),
            description: String::new(),
            kind: ModelKind::Text,
            created_at: None,
            test_cases: vec![TestCase::with_response("case", response)],
        }
    }

    fn request(model: &str, messages: Vec<InputMessage>) -> MessagesRequest {
        MessagesRequest {
            model: model.into(),
            messages,
            max_tokens: Some(64),
            system: None,
            stream: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_create_message() {
        let engine = engine(vec![spec("m1", "hello there friend")]);
        let response = engine
            .create_message(&request("m1", vec![InputMessage::user("hi")]))
            .unwrap();
        assert_eq!(response.text(), "hello there friend");
        assert_eq!(response.usage.input_tokens, 1);
        assert_eq!(response.usage.output_tokens, 5);
        assert!(response.id.starts_with("msg_"));
    }

    #[test]
    fn test_ids_are_fresh_per_call() {
        let engine = engine(vec![spec("m1", "ok")]);
        let req = request("m1", vec![InputMessage::user("hi")]);
        let a = engine.create_message(&req).unwrap();
        let b = engine.create_message(&req).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_stream_rejects_unknown_model_with_single_error() {
        let engine = engine(vec![spec("m1", "ok")]);
        let events: Vec<StreamEvent> = engine
            .create_message_stream(&request("m9", vec![InputMessage::user("hi")]))
            .collect();
        assert_eq!(
            events,
            vec![StreamEvent::Error {
                message: "Model 'm9' does not exist".into()
            }]
        );
    }

    #[test]
    fn test_stream_matches_non_stream_text() {
        let engine = engine(vec![spec("m1", "one two three four five")]);
        let req = request("m1", vec![InputMessage::user("hi")]);
        let full = engine.create_message(&req).unwrap();
        let streamed: String = engine
            .create_message_stream(&req)
            .filter_map(|e| e.delta_text().map(str::to_string))
            .collect();
        assert_eq!(streamed, full.text());
    }

    #[test]
    fn test_listing_and_lookup() {
        let engine = engine(vec![spec("a", "x"), spec("b", "y")]);
        let listing = engine.list_models();
        assert_eq!(listing.data.len(), 2);
        assert_eq!(listing.first_id.as_deref(), Some("a"));
        assert_eq!(listing.last_id.as_deref(), Some("b"));
        assert_eq!(listing.data[0].display_name, "a display");

        assert_eq!(engine.get_model("b").unwrap().id, "b");
        assert!(matches!(
            engine.get_model("zzz"),
            Err(MockError::ModelNotFound(id)) if id == "zzz"
        ));
    }

    #[test]
    fn test_empty_catalog_listing() {
        let engine = MessageEngine::new(Arc::new(ModelCatalog::default()));
        let listing = engine.list_models();
        assert!(listing.data.is_empty());
        assert!(listing.first_id.is_none());
        assert!(listing.last_id.is_none());
    }
}
