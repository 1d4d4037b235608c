use crate::error::LlmError;
use crate::streaming::StreamChunk;
use crate::types::Message;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;

/// Lazy, forward-only sequence of generated text deltas.
///
/// Terminated by upstream end-of-stream; there is no sentinel element.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

/// Trait for chat-completion round trips against an OpenAI-compatible
/// endpoint.
///
/// Provides both streaming and non-streaming completions. Each logical call
/// is independent; implementations must not leak messages or model choice
/// between calls.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Non-streaming chat completion
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Streaming chat completion
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream, LlmError>;
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }
}

/// Generation parameters. Fixed deployment configuration rather than
/// request input; only `model` is selected per call.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormat>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Output constraint for providers that support structured responses.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Any syntactically valid JSON object
    JsonObject,

    /// JSON conforming to a named schema
    JsonSchema { name: String, schema: Value },
}

impl ResponseFormat {
    /// OpenAI `response_format` wire shape
    pub fn to_wire(&self) -> Value {
        match self {
            Self::JsonObject => serde_json::json!({ "type": "json_object" }),
            Self::JsonSchema { name, schema } => serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "strict": true,
                    "schema": schema,
                },
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}
