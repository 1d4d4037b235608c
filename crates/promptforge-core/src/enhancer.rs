use crate::decoder::{self, DecodePolicy, EnhancedPrompt};
use crate::error::PipelineError;
use crate::formatter::format_template;
use crate::strategy::{StrategyCatalog, StrategyId};
use promptforge_llm::{ChatClient, ChatOptions, ChatRequest, Message, ResponseFormat};
use std::sync::Arc;

/// The enhancement stage: rewrites a raw prompt into a polished one with a
/// single structured, non-streaming model call.
///
/// Uses its own (typically smaller) model, independent of the generation
/// stage. There is no fallback prompt; every failure surfaces.
pub struct Enhancer {
    client: Arc<dyn ChatClient>,
    model: String,
    options: ChatOptions,
    policy: DecodePolicy,
}

impl Enhancer {
    pub fn new(
        client: Arc<dyn ChatClient>,
        model: impl Into<String>,
        options: ChatOptions,
        policy: DecodePolicy,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            options,
            policy,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Look up the strategy, format its template with the raw prompt, run
    /// the enhancement call and decode the structured output.
    pub async fn enhance(
        &self,
        catalog: &StrategyCatalog,
        strategy: StrategyId,
        raw_prompt: &str,
    ) -> Result<EnhancedPrompt, PipelineError> {
        let definition = catalog.lookup(strategy)?;
        let formatted = format_template(definition.prompt_template, raw_prompt)?;

        tracing::info!(strategy = %strategy, model = %self.model, "enhancing prompt");

        let mut options = self.options.clone();
        if self.policy == DecodePolicy::SchemaConstrained {
            options = options.response_format(ResponseFormat::JsonSchema {
                name: format!("{}_output", definition.name),
                schema: definition.output_schema(),
            });
        }

        let messages = vec![
            Message::system(definition.system_prompt),
            Message::human(formatted),
        ];
        let request = ChatRequest::new(self.model.clone(), messages).with_options(options);

        let response = self
            .client
            .chat(request)
            .await
            .map_err(|e| PipelineError::from(e).in_stage("enhancement"))?;

        let content = response.content.ok_or_else(|| {
            PipelineError::malformed("enhancement call returned no content").in_stage("enhancement")
        })?;

        decoder::decode(self.policy, &content)
    }
}
