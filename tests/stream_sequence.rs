use std::sync::Arc;

use mock_messages::catalog::{ModelCatalog, ModelKind, ModelSpec, TestCase};
use mock_messages::engine::{estimate_tokens, MessageEngine};
use mock_messages::protocol::{InputMessage, MessagesRequest, StreamEvent};
use mock_messages::stream::sse::encode_stream_event;

fn engine_with<S: Into<String>>(cases: Vec<(S, TestCase)>) -> MessageEngine {
    let specs = cases
        .into_iter()
        .map(|(id, case)| {
            let id: String = id.into();
            ModelSpec {
                name: id.to_uppercase(),
                id,
                description: String::new(),
                kind: ModelKind::Text,
                created_at: None,
                test_cases: vec![case],
            }
        })
        .collect();
    MessageEngine::new(Arc::new(
        ModelCatalog::from_specs(specs).expect("valid catalog"),
    ))
}

fn request(model: &str) -> MessagesRequest {
    serde_json::from_value(serde_json::json!({
        "model": model,
        "max_tokens": 32,
        "stream": true,
        "messages": [{"role": "user", "content": "tell me something"}]
    }))
    .expect("request")
}

fn event_names(events: &[StreamEvent]) -> Vec<&'static str> {
    events.iter().map(StreamEvent::event_name).collect()
}

fn assert_well_formed(events: &[StreamEvent]) {
    let names = event_names(events);
    assert!(names.len() >= 4, "too few events: {names:?}");
    assert_eq!(names[0], "message_start");
    assert_eq!(names[1], "content_block_start");
    assert_eq!(names[names.len() - 2], "message_delta");
    assert_eq!(names[names.len() - 1], "message_stop");
    assert!(names[2..names.len() - 2]
        .iter()
        .all(|name| *name == "content_block_delta"));
}

fn output_tokens(events: &[StreamEvent]) -> u64 {
    events
        .iter()
        .find_map(|event| match event {
            StreamEvent::MessageDelta { usage, .. } => Some(usage.output_tokens),
            _ => None,
        })
        .expect("message_delta present")
}

#[test]
fn test_deltas_reconstruct_every_response() {
    let responses = [
        "hello there friend",
        "one",
        "one two",
        "one two three",
        "ends with a space ",
        "double  spaced words",
        "multi\nline\ttext with tabs",
        "",
    ];
    let engine = engine_with(
        responses
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("m{i}"), TestCase::with_response("c", *text)))
            .collect(),
    );

    for (i, expected) in responses.iter().enumerate() {
        let events: Vec<StreamEvent> = engine
            .create_message_stream(&request(&format!("m{i}")))
            .collect();
        assert_well_formed(&events);

        let deltas: Vec<&str> = events.iter().filter_map(StreamEvent::delta_text).collect();
        assert_eq!(deltas.concat(), *expected, "response {i}");

        let per_chunk: u64 = deltas.iter().map(|d| estimate_tokens(d)).sum();
        assert_eq!(output_tokens(&events), per_chunk, "response {i}");
    }
}

#[test]
fn test_empty_response_yields_single_empty_delta() {
    let engine = engine_with(vec![("blank", TestCase::with_response("c", ""))]);
    let events: Vec<StreamEvent> = engine.create_message_stream(&request("blank")).collect();
    let deltas: Vec<&str> = events.iter().filter_map(StreamEvent::delta_text).collect();
    assert_eq!(deltas, vec![""]);
    assert_eq!(output_tokens(&events), 0);
}

#[test]
fn test_authored_chunks_take_precedence() {
    let case = TestCase::with_response("c", "abc def ghi").with_stream_chunks(["abc d", "ef ghi"]);
    let engine = engine_with(vec![("chunked", case)]);
    let events: Vec<StreamEvent> = engine.create_message_stream(&request("chunked")).collect();
    let deltas: Vec<&str> = events.iter().filter_map(StreamEvent::delta_text).collect();
    assert_eq!(deltas, vec!["abc d", "ef ghi"]);
    assert_eq!(output_tokens(&events), 2 + 2);
}

#[test]
fn test_stream_is_fused_after_stop() {
    let engine = engine_with(vec![("m", TestCase::with_response("c", "a b c"))]);
    let mut stream = engine.create_message_stream(&request("m"));
    let count = stream.by_ref().count();
    assert_eq!(count, 2 + 2 + 2);
    for _ in 0..3 {
        assert!(stream.next().is_none());
    }
}

#[test]
fn test_builtin_catalog_streams_are_well_formed() {
    let catalog = Arc::new(ModelCatalog::builtin().expect("builtin catalog"));
    let ids: Vec<String> = catalog.iter().map(|m| m.id().to_string()).collect();
    let engine = MessageEngine::new(catalog);
    for id in ids {
        let events: Vec<StreamEvent> = engine.create_message_stream(&request(&id)).collect();
        assert_well_formed(&events);

        let mut non_stream = request(&id);
        non_stream.stream = Some(false);
        let full = engine.create_message(&non_stream).expect("message");
        let streamed: String = events.iter().filter_map(StreamEvent::delta_text).collect();
        assert_eq!(streamed, full.text(), "model {id}");

        for event in &events {
            let frame = encode_stream_event(event).expect("frame");
            let text = std::str::from_utf8(&frame).expect("utf-8");
            assert!(text.starts_with(&format!("event: {}\ndata: ", event.event_name())));
            assert!(text.ends_with("\n\n"));
        }
    }
}

#[test]
fn test_rejected_stream_has_one_error_event() {
    let engine = engine_with(vec![("m", TestCase::with_response("c", "x"))]);
    let mut req = request("m");
    req.messages = vec![InputMessage {
        role: "assistant".into(),
        content: serde_json::Value::String("no user here".into()),
    }];
    let stream = engine.create_message_stream(&req);
    assert!(stream.is_rejected());
    let events: Vec<StreamEvent> = stream.collect();
    assert_eq!(
        events,
        vec![StreamEvent::Error {
            message: "No user message found".into()
        }]
    );
}
