use axum::{
    extract::State,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};
use promptforge_core::{
    ConversationRequest, ConversationTurn, PipelineReply, ReplyStream, StrategyId,
};

#[derive(Debug, Deserialize)]
pub struct ConversationIn {
    #[serde(default = "default_strategy")]
    pub prompt_type: StrategyId,

    /// The already-final prompt for continued turns
    #[serde(default)]
    pub message: String,

    /// Ordered [user, assistant] pairs, oldest first
    #[serde(default)]
    pub history: Vec<(String, String)>,

    #[serde(default = "default_stream")]
    pub stream: bool,

    /// The raw prompt to enhance on the first turn
    #[serde(default)]
    pub latest_prompt: String,
}

fn default_strategy() -> StrategyId {
    StrategyId::EnhancePrompt
}

fn default_stream() -> bool {
    true
}

/// Handle one conversation turn, streamed or whole
#[utoipa::path(
    post,
    path = "/api/conversation",
    responses(
        (status = 200, description = "Generated response, JSON or SSE stream"),
        (status = 429, description = "Provider rate limit"),
        (status = 503, description = "Provider unreachable")
    ),
    tag = "conversation"
)]
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Json(data): Json<ConversationIn>,
) -> ApiResult<Response> {
    let request = ConversationRequest {
        strategy: data.prompt_type,
        message: data.message,
        history: data
            .history
            .into_iter()
            .map(ConversationTurn::from)
            .collect(),
        stream: data.stream,
        latest_prompt: data.latest_prompt,
    };

    match state.pipeline.respond(request).await? {
        PipelineReply::Complete(text) => {
            Ok(Json(serde_json::json!({ "response": text })).into_response())
        }
        PipelineReply::Stream(chunks) => Ok(relay_sse(chunks).into_response()),
    }
}

/// Map pipeline chunks onto SSE events.
///
/// A mid-stream failure becomes one final `error` event; chunks already
/// delivered are never retracted.
fn relay_sse(chunks: ReplyStream) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = chunks.map(|item| {
        let event = match item {
            Ok(chunk) => Event::default()
                .event("message")
                .json_data(serde_json::json!({ "content": chunk.content })),
            Err(e) => Event::default()
                .event("error")
                .json_data(serde_json::json!({ "error": e.to_string() })),
        };

        Ok::<Event, Infallible>(event.unwrap_or_default())
    });

    Sse::new(events)
}
