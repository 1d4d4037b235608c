use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use promptforge_api::{
    config::Config,
    middleware::logging,
    routes::{completion, conversation, health},
    state::AppState,
};
use promptforge_core::{
    ConversationPipeline, DecodePolicy, Enhancer, GenerationSettings, StrategyCatalog,
};
use promptforge_llm::{ChatClient, ChatOptions, ProxyClient, ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting PromptForge API server");
    tracing::info!("Completion proxy: {}", config.llm.proxy_url);
    tracing::info!(
        "Models: enhancement={}, generation={}",
        config.llm.enhancement_model,
        config.llm.generation_model
    );

    // Initialize LLM client
    let proxy_config = ProxyConfig::new(config.llm.proxy_url.clone())
        .with_api_key(config.llm.api_key.clone())
        .with_timeout(config.llm.timeout_secs);
    let client: Arc<dyn ChatClient> = Arc::new(ProxyClient::new(&proxy_config)?);

    // Load the strategy catalog
    let catalog = Arc::new(StrategyCatalog::builtin());
    tracing::info!("Loaded {} prompt strategies", catalog.len());

    // Build the two-stage pipeline
    let options = ChatOptions::new()
        .temperature(config.llm.temperature)
        .max_tokens(config.llm.max_tokens);
    let policy = if config.llm.structured_output {
        DecodePolicy::SchemaConstrained
    } else {
        DecodePolicy::BestEffort
    };
    let enhancer = Enhancer::new(
        client.clone(),
        config.llm.enhancement_model.clone(),
        options,
        policy,
    );
    let generation = GenerationSettings {
        model: config.llm.generation_model.clone(),
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
    };
    let pipeline = Arc::new(ConversationPipeline::new(
        catalog.clone(),
        client.clone(),
        enhancer,
        generation,
    ));

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), catalog, client, pipeline));

    // Build router
    let app = build_router(state.clone());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Conversation pipeline
        .route("/api/conversation", post(conversation::conversation))
        // One-shot completions
        .route("/api/completion/generate", post(completion::generate))
        .route(
            "/api/completion/generate/stream",
            post(completion::generate_stream),
        );

    // Build full router with middleware
    Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &promptforge_api::config::Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &promptforge_api::config::Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
