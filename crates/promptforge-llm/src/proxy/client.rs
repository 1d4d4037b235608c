// OpenAI-compatible proxy client (HTTP direct, no SDK)

use crate::error::LlmError;
use crate::streaming::parse_chat_sse_stream;
use crate::traits::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, ChunkStream, TokenUsage,
};
use crate::types::Message;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the completion proxy endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Base URL of the OpenAI-compatible endpoint, e.g. "http://litellm:4000"
    pub base_url: String,
    /// Proxies generally accept any placeholder key
    pub api_key: String,
    /// Bound for one provider round trip; timeouts surface as `Connection`
    pub timeout_secs: u64,
}

impl ProxyConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: "anything".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Client for an OpenAI-compatible chat-completion endpoint behind a proxy.
///
/// Holds one pooled HTTP client; every logical call is independent.
pub struct ProxyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| LlmError::Unexpected(format!("invalid API key format: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Unexpected(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
        stream: bool,
    ) -> Result<Value, LlmError> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": stream,
        });

        let obj = request
            .as_object_mut()
            .ok_or_else(|| LlmError::Unexpected("request payload is not an object".into()))?;

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if let Some(format) = &options.response_format {
            obj.insert("response_format".to_string(), format.to_wire());
        }

        Ok(request)
    }

    async fn post_chat(&self, payload: &Value) -> Result<reqwest::Response, LlmError> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for ProxyClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let payload =
            self.build_chat_request(&request.model, &request.messages, &request.options, false)?;

        tracing::debug!(model = %request.model, "sending chat completion request");

        let response = self.post_chat(&payload).await?;

        let raw: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Unexpected(format!("failed to parse response: {}", e)))?;

        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            usage: raw.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream, LlmError> {
        let payload =
            self.build_chat_request(&request.model, &request.messages, &request.options, true)?;

        tracing::debug!(model = %request.model, "opening chat completion stream");

        let response = self.post_chat(&payload).await?;

        Ok(parse_chat_sse_stream(response))
    }
}

// ============================================================================
// WIRE RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
