//! Answer generation through hosted chat-completion APIs

mod http;
mod provider;
mod registry;

pub use http::ChatCompletionsProvider;
pub use provider::{ChatMessage, GenerationError, GenerationProvider, GenerationResult};
pub use registry::ProviderRegistry;
