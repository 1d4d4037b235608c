use crate::config::Config;
use promptforge_core::{ConversationPipeline, StrategyCatalog};
use promptforge_llm::ChatClient;
use std::sync::Arc;

/// Shared application state passed to all handlers
///
/// Everything is read-only after startup and wrapped in Arc for sharing
/// across concurrent request tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<StrategyCatalog>,
    pub client: Arc<dyn ChatClient>,
    pub pipeline: Arc<ConversationPipeline>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<StrategyCatalog>,
        client: Arc<dyn ChatClient>,
        pipeline: Arc<ConversationPipeline>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            client,
            pipeline,
        }
    }
}
