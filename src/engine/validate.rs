use std::borrow::Cow;
use std::sync::Arc;

use crate::catalog::{ModelCatalog, ModelDescriptor, TestCase};
use crate::error::MockError;
use crate::protocol::MessagesRequest;

/// A request that passed validation, resolved against the catalog.
#[derive(Debug)]
pub struct ValidatedRequest<'a> {
    pub model: &'a Arc<ModelDescriptor>,
    pub test_case: &'a Arc<TestCase>,
    /// Text of the most recent user message.
    pub user_text: Cow<'a, str>,
}

/// Resolve the model, then find the last user message.
///
/// # Errors
///
/// Returns [`MockError::ModelNotFound`] when the model id is unknown and
/// [`MockError::NoUserMessage`] when no message has role `user`.
pub fn validate_request<'a>(
    catalog: &'a ModelCatalog,
    request: &'a MessagesRequest,
) -> Result<ValidatedRequest<'a>, MockError> {
    let model = catalog
        .lookup(&request.model)
        .ok_or_else(|| MockError::ModelNotFound(request.model.clone()))?;

    let user_message = request
        .last_user_message()
        .ok_or(MockError::NoUserMessage)?;

    Ok(ValidatedRequest {
        model,
        test_case: model.selected_test_case(),
        user_text: user_message.text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModelKind, ModelSpec};
    use crate::protocol::InputMessage;

    fn catalog() -> ModelCatalog {
        ModelCatalog::from_specs(vec![ModelSpec {
            id: "m1".into(),
            name: "M1".into(),
            description: String::new(),
            kind: ModelKind::Text,
            created_at: None,
            test_cases: vec![
                TestCase::with_response("first", "hello there friend"),
                TestCase::with_response("second", "unused"),
            ],
        }])
        .unwrap()
    }

    fn request(model: &str, messages: Vec<InputMessage>) -> MessagesRequest {
        MessagesRequest {
            model: model.into(),
            messages,
            max_tokens: None,
            system: None,
            stream: None,
            extra: serde_json::Map::new(),
        }
    }

    fn assistant(text: &str) -> InputMessage {
        InputMessage {
            role: "assistant".into(),
            content: serde_json::Value::String(text.into()),
        }
    }

    #[test]
    fn test_valid_request_selects_first_case_and_last_user() {
        let catalog = catalog();
        let req = request(
            "m1",
            vec![
                InputMessage::user("older"),
                assistant("reply"),
                InputMessage::user("latest"),
            ],
        );
        let validated = validate_request(&catalog, &req).unwrap();
        assert_eq!(validated.model.id(), "m1");
        assert_eq!(validated.test_case.name, "first");
        assert_eq!(validated.user_text, "latest");
    }

    #[test]
    fn test_unknown_model() {
        let catalog = catalog();
        let req = request("nope", vec![InputMessage::user("hi")]);
        let err = validate_request(&catalog, &req).unwrap_err();
        assert_eq!(err.to_string(), "Model 'nope' does not exist");
    }

    #[test]
    fn test_no_user_message() {
        let catalog = catalog();
        let req = request("m1", vec![assistant("only me")]);
        let err = validate_request(&catalog, &req).unwrap_err();
        assert!(matches!(err, MockError::NoUserMessage));
    }

    #[test]
    fn test_empty_messages() {
        let catalog = catalog();
        let req = request("m1", Vec::new());
        assert!(matches!(
            validate_request(&catalog, &req),
            Err(MockError::NoUserMessage)
        ));
    }

    #[test]
    fn test_model_checked_before_messages() {
        let catalog = catalog();
        let req = request("nope", Vec::new());
        assert!(matches!(
            validate_request(&catalog, &req),
            Err(MockError::ModelNotFound(id)) if id == "nope"
        ));
    }
}
