pub mod error;
pub mod proxy;
pub mod streaming;
pub mod traits;
pub mod types;

pub use error::LlmError;
pub use proxy::{ProxyClient, ProxyConfig};
pub use streaming::StreamChunk;
pub use traits::{
    ChatClient,
    ChatOptions, ChatRequest, ChatResponse,
    ChunkStream,
    ResponseFormat,
    TokenUsage,
};
pub use types::Message;
