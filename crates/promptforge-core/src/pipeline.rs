use crate::enhancer::Enhancer;
use crate::error::PipelineError;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::strategy::{StrategyCatalog, StrategyId};
use futures::{Stream, StreamExt};
use promptforge_llm::{ChatClient, ChatOptions, ChatRequest, ChunkStream, Message, StreamChunk};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;

/// One user/assistant exchange. A history is ordered oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
}

impl ConversationTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

impl From<(String, String)> for ConversationTurn {
    fn from((user, assistant): (String, String)) -> Self {
        Self { user, assistant }
    }
}

/// One inbound conversation request.
///
/// An empty `history` marks the first turn of a conversation: the raw
/// `latest_prompt` is enhanced to derive the turn's prompt. A non-empty
/// history marks a continued turn: `message` is already final.
#[derive(Debug, Clone)]
pub struct ConversationRequest {
    pub strategy: StrategyId,
    pub message: String,
    pub history: Vec<ConversationTurn>,
    pub stream: bool,
    pub latest_prompt: String,
}

/// Fixed parameters of the generation stage.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Stream of relayed generation deltas.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, PipelineError>> + Send>>;

/// Reply of one pipeline run: the whole text, or a live relay.
pub enum PipelineReply {
    Complete(String),
    Stream(ReplyStream),
}

impl std::fmt::Debug for PipelineReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineReply::Complete(s) => f.debug_tuple("Complete").field(s).finish(),
            PipelineReply::Stream(_) => f.debug_tuple("Stream").field(&"<stream>").finish(),
        }
    }
}

/// The two-stage conversation pipeline.
///
/// Not a persistent state machine: whether a request is a first or a
/// continued turn is recomputed per request from its history alone. All
/// fields are read-only after construction, so one pipeline serves any
/// number of concurrent requests.
pub struct ConversationPipeline {
    catalog: Arc<StrategyCatalog>,
    client: Arc<dyn ChatClient>,
    enhancer: Enhancer,
    generation: GenerationSettings,
}

impl ConversationPipeline {
    pub fn new(
        catalog: Arc<StrategyCatalog>,
        client: Arc<dyn ChatClient>,
        enhancer: Enhancer,
        generation: GenerationSettings,
    ) -> Self {
        Self {
            catalog,
            client,
            enhancer,
            generation,
        }
    }

    /// Handle one conversation request end to end.
    pub async fn respond(
        &self,
        request: ConversationRequest,
    ) -> Result<PipelineReply, PipelineError> {
        let final_prompt = if request.history.is_empty() {
            let enhanced = self
                .enhancer
                .enhance(&self.catalog, request.strategy, &request.latest_prompt)
                .await?;
            tracing::info!(strategy = %request.strategy, "first turn, prompt enhanced");
            enhanced.final_prompt
        } else {
            // Enhancement is a one-time polish of the opening prompt;
            // later turns reuse the client-supplied message verbatim and
            // save a model round trip.
            request.message
        };

        let messages = build_messages(&request.history, &final_prompt);
        let options = ChatOptions::new()
            .temperature(self.generation.temperature)
            .max_tokens(self.generation.max_tokens);
        let chat_request =
            ChatRequest::new(self.generation.model.clone(), messages).with_options(options);

        if request.stream {
            let upstream = self
                .client
                .chat_stream(chat_request)
                .await
                .map_err(|e| PipelineError::from(e).in_stage("generation"))?;
            Ok(PipelineReply::Stream(relay(upstream)))
        } else {
            let response = self
                .client
                .chat(chat_request)
                .await
                .map_err(|e| PipelineError::from(e).in_stage("generation"))?;
            Ok(PipelineReply::Complete(
                response.content.unwrap_or_default(),
            ))
        }
    }
}

/// Assemble the generation messages: system prompt first, history
/// interleaved as user/assistant pairs in order, the turn's prompt last.
fn build_messages(history: &[ConversationTurn], final_prompt: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);

    messages.push(Message::system(DEFAULT_SYSTEM_PROMPT));
    for turn in history {
        messages.push(Message::human(turn.user.clone()));
        messages.push(Message::ai(turn.assistant.clone()));
    }
    messages.push(Message::human(final_prompt));

    messages
}

/// Forward chunks as they arrive, without buffering the stream.
///
/// The first chunk is yielded as soon as the upstream produces it, and
/// dropping the returned stream stops polling the upstream with it. On a
/// mid-stream failure the already-delivered chunks stay valid and the
/// stream ends with a single error item.
fn relay(mut upstream: ChunkStream) -> ReplyStream {
    Box::pin(async_stream::stream! {
        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    if chunk.content.is_empty() {
                        continue;
                    }
                    yield Ok(chunk);
                }
                Err(e) => {
                    yield Err(PipelineError::from(e).in_stage("generation"));
                    return;
                }
            }
        }
    })
}
