pub mod decoder;
pub mod enhancer;
pub mod error;
pub mod formatter;
pub mod pipeline;
pub mod prompts;
pub mod strategy;

pub use decoder::{DecodePolicy, EnhancedPrompt};
pub use enhancer::Enhancer;
pub use error::{ErrorKind, PipelineError};
pub use pipeline::{
    ConversationPipeline, ConversationRequest, ConversationTurn,
    GenerationSettings, PipelineReply, ReplyStream,
};
pub use strategy::{StrategyCatalog, StrategyDefinition, StrategyId};
