use std::iter::FusedIterator;
use std::sync::Arc;

use crate::catalog::TestCase;
use crate::protocol::{
    ContentBlock, ContentDelta, MessageDeltaBody, MessageDeltaUsage, StopReason, StreamEvent,
};

use super::assemble::skeleton_response;
use super::usage::estimate_tokens;

/// Lazy protocol event sequence for one streaming call.
///
/// Success path, each singleton exactly once:
/// `message_start`, `content_block_start`, `content_block_delta`*,
/// `message_delta`, `message_stop`. A rejected request yields a single
/// `error` event. Once exhausted the stream stays exhausted.
pub struct MessageStream {
    inner: Inner,
}

enum Inner {
    Rejected(Option<String>),
    Scripted(Box<ScriptedStream>),
}

struct ScriptedStream {
    phase: Phase,
    message_id: String,
    model: String,
    test_case: Arc<TestCase>,
    cursor: ChunkCursor,
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    MessageStart,
    ContentBlockStart,
    Deltas,
    MessageStop,
    Finished,
}

/// Position in the chunk list. Authored chunks are indexed; derived word
/// pairs are tracked by byte offset into the response (`None` = drained).
enum ChunkCursor {
    Authored { next: usize },
    WordPairs { offset: Option<usize> },
}

impl ChunkCursor {
    fn for_test_case(test_case: &TestCase) -> Self {
        if test_case.stream_chunks.is_empty() {
            ChunkCursor::WordPairs { offset: Some(0) }
        } else {
            ChunkCursor::Authored { next: 0 }
        }
    }

    fn next_chunk(&mut self, test_case: &TestCase) -> Option<String> {
        match self {
            ChunkCursor::Authored { next } => {
                let chunk = test_case.stream_chunks.get(*next)?;
                *next += 1;
                Some(chunk.clone())
            }
            ChunkCursor::WordPairs { offset } => {
                let start = (*offset)?;
                let (chunk, resume) = next_word_pair(&test_case.response, start);
                *offset = resume;
                Some(chunk.to_string())
            }
        }
    }
}

/// Next two-word group of `text` starting at byte `start`.
///
/// Words are separated by single ASCII spaces. A group that is followed by
/// more text keeps its trailing space; the final group has none. Returns the
/// group and the offset of the following group, if there is one.
#[must_use]
pub fn next_word_pair(text: &str, start: usize) -> (&str, Option<usize>) {
    let rest = &text[start..];
    let Some(first) = rest.find(' ') else {
        return (rest, None);
    };
    match rest[first + 1..].find(' ') {
        Some(second) => {
            let end = first + 1 + second + 1;
            (&rest[..end], Some(start + end))
        }
        None => (rest, None),
    }
}

/// All two-word groups of `text`, in order. Their concatenation is `text`.
pub fn word_pairs(text: &str) -> impl Iterator<Item = &str> {
    let mut offset = Some(0);
    std::iter::from_fn(move || {
        let start = offset?;
        let (chunk, next) = next_word_pair(text, start);
        offset = next;
        Some(chunk)
    })
}

impl MessageStream {
    pub(crate) fn scripted(
        message_id: String,
        model: &str,
        test_case: Arc<TestCase>,
        input_tokens: u64,
    ) -> Self {
        let cursor = ChunkCursor::for_test_case(&test_case);
        Self {
            inner: Inner::Scripted(Box::new(ScriptedStream {
                phase: Phase::MessageStart,
                message_id,
                model: model.to_string(),
                test_case,
                cursor,
                input_tokens,
                output_tokens: 0,
            })),
        }
    }

    pub(crate) fn rejected(message: String) -> Self {
        Self {
            inner: Inner::Rejected(Some(message)),
        }
    }

    /// `true` when this stream carries a validation error instead of a message.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self.inner, Inner::Rejected(_))
    }

    /// Estimated tokens of the prompting user message (0 when rejected).
    #[must_use]
    pub fn input_tokens(&self) -> u64 {
        match &self.inner {
            Inner::Scripted(stream) => stream.input_tokens,
            Inner::Rejected(_) => 0,
        }
    }

    /// Output tokens accumulated over the deltas emitted so far.
    #[must_use]
    pub fn output_tokens(&self) -> u64 {
        match &self.inner {
            Inner::Scripted(stream) => stream.output_tokens,
            Inner::Rejected(_) => 0,
        }
    }
}

impl ScriptedStream {
    fn next_event(&mut self) -> Option<StreamEvent> {
        match self.phase {
            Phase::MessageStart => {
                self.phase = Phase::ContentBlockStart;
                Some(StreamEvent::MessageStart {
                    message: skeleton_response(self.message_id.clone(), &self.model),
                })
            }
            Phase::ContentBlockStart => {
                self.phase = Phase::Deltas;
                Some(StreamEvent::ContentBlockStart {
                    index: 0,
                    content_block: ContentBlock::Text {
                        text: String::new(),
                    },
                })
            }
            Phase::Deltas => {
                if let Some(text) = self.cursor.next_chunk(&self.test_case) {
                    self.output_tokens += estimate_tokens(&text);
                    return Some(StreamEvent::ContentBlockDelta {
                        index: 0,
                        delta: ContentDelta::TextDelta { text },
                    });
                }
                self.phase = Phase::MessageStop;
                Some(StreamEvent::MessageDelta {
                    delta: MessageDeltaBody {
                        stop_reason: Some(StopReason::EndTurn),
                        stop_sequence: None,
                    },
                    usage: MessageDeltaUsage {
                        output_tokens: self.output_tokens,
                    },
                })
            }
            Phase::MessageStop => {
                self.phase = Phase::Finished;
                Some(StreamEvent::MessageStop {})
            }
            Phase::Finished => None,
        }
    }
}

impl Iterator for MessageStream {
    type Item = StreamEvent;

    fn next(&mut self) -> Option<StreamEvent> {
        match &mut self.inner {
            Inner::Rejected(message) => message
                .take()
                .map(|message| StreamEvent::Error { message }),
            Inner::Scripted(stream) => stream.next_event(),
        }
    }
}

impl FusedIterator for MessageStream {}
