use async_trait::async_trait;
use futures::StreamExt;
use promptforge_core::{
    ConversationPipeline, ConversationRequest, ConversationTurn, DecodePolicy, Enhancer,
    ErrorKind, GenerationSettings, PipelineReply, StrategyCatalog, StrategyId,
};
use promptforge_llm::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, ChunkStream, LlmError, ResponseFormat,
    StreamChunk,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// ChatClient substitute replaying scripted outcomes and recording every
/// request it receives.
#[derive(Default)]
struct ScriptedClient {
    chat_results: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    stream_chunks: Mutex<Vec<Result<StreamChunk, LlmError>>>,
    stream_error: Mutex<Option<LlmError>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn script_chat(&self, result: Result<ChatResponse, LlmError>) {
        self.chat_results.lock().unwrap().push_back(result);
    }

    fn script_chunks(&self, chunks: Vec<Result<StreamChunk, LlmError>>) {
        *self.stream_chunks.lock().unwrap() = chunks;
    }

    fn script_stream_error(&self, error: LlmError) {
        *self.stream_error.lock().unwrap() = Some(error);
    }

    fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.chat_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted chat call")
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream, LlmError> {
        self.requests.lock().unwrap().push(request);
        if let Some(error) = self.stream_error.lock().unwrap().take() {
            return Err(error);
        }
        let chunks = std::mem::take(&mut *self.stream_chunks.lock().unwrap());
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

fn text_response(content: impl Into<String>) -> ChatResponse {
    ChatResponse {
        content: Some(content.into()),
        finish_reason: Some("stop".to_string()),
        usage: None,
    }
}

fn enhancement_response(final_prompt: &str) -> ChatResponse {
    text_response(
        serde_json::json!({ "body": "reasoning", "final_prompt": final_prompt }).to_string(),
    )
}

fn pipeline_with(client: Arc<dyn ChatClient>, policy: DecodePolicy) -> ConversationPipeline {
    let catalog = Arc::new(StrategyCatalog::builtin());
    let options = ChatOptions::new().temperature(0.5).max_tokens(8192);
    let enhancer = Enhancer::new(client.clone(), "gpt-4o-mini", options, policy);
    let generation = GenerationSettings {
        model: "gemini-flash".to_string(),
        temperature: 0.5,
        max_tokens: 8192,
    };
    ConversationPipeline::new(catalog, client, enhancer, generation)
}

fn first_turn_request(latest_prompt: &str, stream: bool) -> ConversationRequest {
    ConversationRequest {
        strategy: StrategyId::EnhancePrompt,
        message: String::new(),
        history: Vec::new(),
        stream,
        latest_prompt: latest_prompt.to_string(),
    }
}

fn continued_request(message: &str, stream: bool) -> ConversationRequest {
    ConversationRequest {
        strategy: StrategyId::EnhancePrompt,
        message: message.to_string(),
        history: vec![ConversationTurn::new("earlier question", "earlier answer")],
        stream,
        latest_prompt: String::new(),
    }
}

#[tokio::test]
async fn test_first_turn_enhances_before_generating() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Ok(enhancement_response("polished prompt")));
    client.script_chat(Ok(text_response("generated answer")));

    let pipeline = pipeline_with(client.clone(), DecodePolicy::BestEffort);
    let reply = pipeline
        .respond(first_turn_request("raw prompt", false))
        .await
        .unwrap();

    match reply {
        PipelineReply::Complete(text) => assert_eq!(text, "generated answer"),
        PipelineReply::Stream(_) => panic!("Expected complete reply"),
    }

    let requests = client.recorded_requests();
    assert_eq!(requests.len(), 2);

    // Enhancement call: strategy system prompt + templated raw prompt,
    // against the enhancement model.
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[0].messages[0].role(), "system");
    assert!(requests[0].messages[1].content().contains("raw prompt"));

    // Generation call: the enhanced prompt as trailing user message,
    // against the generation model.
    assert_eq!(requests[1].model, "gemini-flash");
    let last = requests[1].messages.last().unwrap();
    assert_eq!(last.role(), "user");
    assert_eq!(last.content(), "polished prompt");
}

#[tokio::test]
async fn test_continued_turn_never_enhances() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Ok(text_response("follow-up answer")));

    let pipeline = pipeline_with(client.clone(), DecodePolicy::BestEffort);
    let reply = pipeline
        .respond(continued_request("already final prompt", false))
        .await
        .unwrap();

    match reply {
        PipelineReply::Complete(text) => assert_eq!(text, "follow-up answer"),
        PipelineReply::Stream(_) => panic!("Expected complete reply"),
    }

    // Exactly one model call: generation, with the client-supplied message
    // used verbatim.
    let requests = client.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gemini-flash");

    let messages = &requests[0].messages;
    assert_eq!(messages[1].content(), "earlier question");
    assert_eq!(messages[2].content(), "earlier answer");
    assert_eq!(messages.last().unwrap().content(), "already final prompt");
}

#[tokio::test]
async fn test_rate_limit_and_connection_failures_stay_distinct() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Err(LlmError::RateLimited("quota".to_string())));

    let pipeline = pipeline_with(client, DecodePolicy::BestEffort);
    let err = pipeline
        .respond(continued_request("hello", false))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimited);

    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Err(LlmError::Connection("unreachable".to_string())));

    let pipeline = pipeline_with(client, DecodePolicy::BestEffort);
    let err = pipeline
        .respond(continued_request("hello", false))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Connection);
}

#[tokio::test]
async fn test_enhancement_failure_surfaces_with_stage_context() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Err(LlmError::Provider("backend exploded".to_string())));

    let pipeline = pipeline_with(client.clone(), DecodePolicy::BestEffort);
    let err = pipeline
        .respond(first_turn_request("raw", false))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Provider);
    assert!(err.message.contains("enhancement"));
    // No generation call after a failed enhancement
    assert_eq!(client.recorded_requests().len(), 1);
}

#[tokio::test]
async fn test_malformed_enhancement_output_stops_the_turn() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Ok(text_response("this is not JSON")));

    let pipeline = pipeline_with(client.clone(), DecodePolicy::BestEffort);
    let err = pipeline
        .respond(first_turn_request("raw", false))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::MalformedOutput);
    assert_eq!(client.recorded_requests().len(), 1);
}

#[tokio::test]
async fn test_stream_relay_preserves_order_and_suppresses_empty_deltas() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chunks(vec![
        Ok(StreamChunk::new("Hel")),
        Ok(StreamChunk::new("lo")),
        Ok(StreamChunk::new("")),
        Ok(StreamChunk::new(" world")),
    ]);

    let pipeline = pipeline_with(client, DecodePolicy::BestEffort);
    let reply = pipeline
        .respond(continued_request("hello", true))
        .await
        .unwrap();

    let PipelineReply::Stream(stream) = reply else {
        panic!("Expected streaming reply");
    };

    let contents: Vec<String> = stream
        .map(|item| item.unwrap().content)
        .collect()
        .await;
    assert_eq!(contents, vec!["Hel", "lo", " world"]);
}

#[tokio::test]
async fn test_stream_open_failure_surfaces_before_any_chunk() {
    let client = Arc::new(ScriptedClient::default());
    client.script_stream_error(LlmError::RateLimited("quota".to_string()));

    let pipeline = pipeline_with(client, DecodePolicy::BestEffort);
    let err = pipeline
        .respond(continued_request("hello", true))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RateLimited);
}

#[tokio::test]
async fn test_mid_stream_failure_ends_relay_with_error_item() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chunks(vec![
        Ok(StreamChunk::new("partial")),
        Err(LlmError::Provider("stream broke".to_string())),
        // Never reached: the relay terminates on the first error
        Ok(StreamChunk::new("ghost")),
    ]);

    let pipeline = pipeline_with(client, DecodePolicy::BestEffort);
    let reply = pipeline
        .respond(continued_request("hello", true))
        .await
        .unwrap();

    let PipelineReply::Stream(stream) = reply else {
        panic!("Expected streaming reply");
    };

    let items: Vec<_> = stream.collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap().content, "partial");
    assert_eq!(items[1].as_ref().unwrap_err().kind, ErrorKind::Provider);
}

/// Client whose stream counts every chunk it actually produces.
struct CountedStreamClient {
    produced: Arc<AtomicUsize>,
}

#[async_trait]
impl ChatClient for CountedStreamClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, LlmError> {
        panic!("unexpected non-streaming call");
    }

    async fn chat_stream(&self, _request: ChatRequest) -> Result<ChunkStream, LlmError> {
        let produced = self.produced.clone();
        Ok(Box::pin(async_stream::stream! {
            for content in ["one", "two", "three"] {
                produced.fetch_add(1, Ordering::SeqCst);
                yield Ok(StreamChunk::new(content));
            }
        }))
    }
}

#[tokio::test]
async fn test_dropping_consumer_stops_chunk_production() {
    let produced = Arc::new(AtomicUsize::new(0));
    let client = Arc::new(CountedStreamClient {
        produced: produced.clone(),
    });

    let pipeline = pipeline_with(client, DecodePolicy::BestEffort);
    let reply = pipeline
        .respond(continued_request("hello", true))
        .await
        .unwrap();

    let PipelineReply::Stream(mut stream) = reply else {
        panic!("Expected streaming reply");
    };

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.content, "one");
    assert_eq!(produced.load(Ordering::SeqCst), 1);

    // Consumer goes away; the upstream must never be polled again.
    drop(stream);
    tokio::task::yield_now().await;
    assert_eq!(produced.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_end_to_end_first_turn_scenario() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Ok(enhancement_response(
        "Write a short, four-line poem about hope",
    )));
    client.script_chat(Ok(text_response("Here is a poem...")));

    let pipeline = pipeline_with(client.clone(), DecodePolicy::BestEffort);
    let reply = pipeline
        .respond(first_turn_request("Write a poem", false))
        .await
        .unwrap();

    match reply {
        PipelineReply::Complete(text) => assert_eq!(text, "Here is a poem..."),
        PipelineReply::Stream(_) => panic!("Expected complete reply"),
    }

    // The generation call carries exactly one user message: the enhanced prompt.
    let requests = client.recorded_requests();
    let user_messages: Vec<&str> = requests[1]
        .messages
        .iter()
        .filter(|m| m.role() == "user")
        .map(|m| m.content())
        .collect();
    assert_eq!(
        user_messages,
        vec!["Write a short, four-line poem about hope"]
    );
}

#[tokio::test]
async fn test_schema_constraint_only_on_enhancement_call() {
    let client = Arc::new(ScriptedClient::default());
    client.script_chat(Ok(text_response(
        serde_json::json!({ "final_prompt": "polished" }).to_string(),
    )));
    client.script_chat(Ok(text_response("answer")));

    let pipeline = pipeline_with(client.clone(), DecodePolicy::SchemaConstrained);
    pipeline
        .respond(first_turn_request("raw", false))
        .await
        .unwrap();

    let requests = client.recorded_requests();
    match &requests[0].options.response_format {
        Some(ResponseFormat::JsonSchema { name, schema }) => {
            assert_eq!(name, "enhance_prompt_output");
            assert_eq!(schema["required"][0], "final_prompt");
        }
        other => panic!("Expected json_schema response format, got {:?}", other),
    }
    assert!(requests[1].options.response_format.is_none());
}
