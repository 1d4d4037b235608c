use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};
use promptforge_core::PipelineError;
use promptforge_llm::{ChatOptions, ChatRequest, Message};

#[derive(Debug, Deserialize)]
pub struct CompletionIn {
    pub prompt: String,

    /// Defaults to the configured generation model
    #[serde(default)]
    pub model: Option<String>,
}

fn build_request(state: &AppState, data: CompletionIn) -> ChatRequest {
    let llm = &state.config.llm;
    let model = data
        .model
        .unwrap_or_else(|| llm.generation_model.clone());

    let options = ChatOptions::new()
        .temperature(llm.temperature)
        .max_tokens(llm.max_tokens);

    ChatRequest::new(model, vec![Message::human(data.prompt)]).with_options(options)
}

/// One-shot completion, no enhancement and no history
#[utoipa::path(
    post,
    path = "/api/completion/generate",
    responses(
        (status = 200, description = "Complete response as plain text")
    ),
    tag = "completion"
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(data): Json<CompletionIn>,
) -> ApiResult<Response> {
    tracing::info!(prompt = %data.prompt, "completion request");

    let request = build_request(&state, data);
    let response = state
        .client
        .chat(request)
        .await
        .map_err(PipelineError::from)?;

    Ok(response.content.unwrap_or_default().into_response())
}

/// One-shot completion streamed as plain text increments
#[utoipa::path(
    post,
    path = "/api/completion/generate/stream",
    responses(
        (status = 200, description = "Streamed response as plain text")
    ),
    tag = "completion"
)]
pub async fn generate_stream(
    State(state): State<Arc<AppState>>,
    Json(data): Json<CompletionIn>,
) -> ApiResult<Response> {
    tracing::info!(prompt = %data.prompt, "streaming completion request");

    let request = build_request(&state, data);
    let chunks = state
        .client
        .chat_stream(request)
        .await
        .map_err(PipelineError::from)?;

    // One delta per write; a mid-stream failure ends the body with a fixed
    // error line, leaving already-sent text in place.
    let body = Body::from_stream(chunks.map(|item| match item {
        Ok(chunk) => Ok::<String, Infallible>(chunk.content),
        Err(e) => {
            tracing::error!("error streaming response: {}", e);
            Ok("Error processing stream.".to_string())
        }
    }));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}
