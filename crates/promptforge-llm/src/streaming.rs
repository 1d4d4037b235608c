use crate::error::LlmError;
use crate::traits::ChunkStream;
use futures::{Stream, StreamExt};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One incremental unit of generated text.
///
/// Chunks with no textual delta are filtered out during parsing, so a
/// consumer never sees an empty `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub content: String,
}

impl StreamChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Wire shape of one SSE frame from a chat-completion stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: u32,
    pub delta: StreamDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    pub fn is_done(&self) -> bool {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .is_some()
    }
}

/// Parse a live chat-completion response body into a chunk stream.
pub fn parse_chat_sse_stream(response: Response) -> ChunkStream {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(LlmError::from_transport));

    parse_sse_bytes(byte_stream)
}

/// Parse an SSE byte stream into text deltas.
///
/// Frames are line-buffered (`data: ` prefixed), the stream ends on the
/// provider's `[DONE]` marker or upstream end-of-stream, and empty deltas
/// are suppressed rather than yielded as `""`. Generic over the byte chunk
/// type so substitutes can feed plain slices in tests.
pub fn parse_sse_bytes<S, B>(byte_stream: S) -> ChunkStream
where
    S: Stream<Item = Result<B, LlmError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut buffer: VecDeque<u8> = VecDeque::with_capacity(8192);

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes.as_ref().iter().copied());

                    while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();

                        if let Ok(line_str) = std::str::from_utf8(&line_bytes) {
                            let line = line_str.trim();

                            if line.is_empty() {
                                continue;
                            }

                            if let Some(data) = line.strip_prefix("data: ") {
                                if data == "[DONE]" {
                                    return;
                                }

                                match serde_json::from_str::<ChatCompletionChunk>(data) {
                                    Ok(chunk) => {
                                        if let Some(content) = chunk.content() {
                                            if !content.is_empty() {
                                                yield Ok(StreamChunk::new(content));
                                            }
                                        }
                                    }
                                    Err(e) => {
                                        yield Err(LlmError::Unexpected(format!(
                                            "failed to parse stream chunk: {}",
                                            e
                                        )));
                                        return;
                                    }
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    // Chunks already yielded stay valid; the stream ends
                    // with this single error item.
                    yield Err(e);
                    return;
                }
            }
        }
    })
}
