use super::{ModelKind, ModelSpec, ScriptedToolCall, TestCase};

const CREATED_AT: &str = "2025-02-19T00:00:00Z";

/// Models served when the configuration does not declare a `models` list.
#[must_use]
pub fn builtin_models() -> Vec<ModelSpec> {
    vec![
        ModelSpec {
            id: "mock-claude-text".to_string(),
            name: "Mock Claude Text".to_string(),
            description: "Plain text replies split into two-word stream deltas".to_string(),
            kind: ModelKind::Text,
            created_at: Some(CREATED_AT.to_string()),
            test_cases: vec![TestCase {
                description: "Short greeting".to_string(),
                prompt: "Hello".to_string(),
                ..TestCase::with_response(
                    "greeting",
                    "Hello! I am a mock assistant. Every reply you get from me is scripted, \
                     so your client can be tested against predictable output.",
                )
            }],
        },
        ModelSpec {
            id: "mock-claude-markdown".to_string(),
            name: "Mock Claude Markdown".to_string(),
            description: "Markdown reply streamed in hand-authored chunks".to_string(),
            kind: ModelKind::Markdown,
            created_at: Some(CREATED_AT.to_string()),
            test_cases: vec![TestCase {
                description: "Markdown with a heading, list and code block".to_string(),
                prompt: "Show me some markdown".to_string(),
                ..TestCase::with_response(
                    "markdown",
                    "# Mock Report\n\n- item one\n- item two\n\n```rust\nfn main() {}\n```\n",
                )
                .with_stream_chunks([
                    "# Mock Report\n\n",
                    "- item one\n",
                    "- item two\n\n",
                    "```rust\n",
                    "fn main() {}\n",
                    "```\n",
                ])
            }],
        },
        ModelSpec {
            id: "mock-claude-thinking".to_string(),
            name: "Mock Claude Thinking".to_string(),
            description: "Answer that carries scripted reasoning content".to_string(),
            kind: ModelKind::Thinking,
            created_at: Some(CREATED_AT.to_string()),
            test_cases: vec![TestCase {
                description: "Arithmetic with reasoning".to_string(),
                prompt: "What is 17 * 3?".to_string(),
                reasoning_content: Some(
                    "17 times 3 is 17 + 17 + 17, which is 51.".to_string(),
                ),
                reasoning_chunks: vec![
                    "17 times 3 is ".to_string(),
                    "17 + 17 + 17, ".to_string(),
                    "which is 51.".to_string(),
                ],
                ..TestCase::with_response("multiply", "17 multiplied by 3 is 51.")
            }],
        },
        ModelSpec {
            id: "mock-claude-tools".to_string(),
            name: "Mock Claude Tools".to_string(),
            description: "Reply scripted around a weather tool call".to_string(),
            kind: ModelKind::ToolCalls,
            created_at: Some(CREATED_AT.to_string()),
            test_cases: vec![TestCase {
                description: "Weather lookup".to_string(),
                prompt: "What's the weather in Paris?".to_string(),
                tool_call: Some(ScriptedToolCall {
                    name: "get_weather".to_string(),
                    arguments: serde_json::json!({"city": "Paris", "unit": "celsius"}),
                    id: Some("toolu_mock_weather".to_string()),
                }),
                tool_call_response: Some(
                    "It is 18 degrees and sunny in Paris right now.".to_string(),
                ),
                ..TestCase::with_response(
                    "weather",
                    "Let me check the weather in Paris for you.",
                )
            }],
        },
    ]
}
