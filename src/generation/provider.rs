//! Generation provider trait and message types

use crate::routing::{ModelProfile, ProviderKind};
use serde::{Deserialize, Serialize};

/// One chat message in OpenAI wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Errors from a single completion attempt
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("No API key configured for {provider}")]
    MissingCredential { provider: ProviderKind },

    #[error("No provider registered for {0}")]
    UnknownProvider(ProviderKind),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// A chat-completion backend
///
/// The model, credential and sampling settings come from the
/// [`ModelProfile`], so one provider instance serves every request.
pub trait GenerationProvider: Send + Sync {
    fn complete(&self, profile: &ModelProfile, messages: &[ChatMessage]) -> GenerationResult<String>;

    /// Provider name used in logs
    fn name(&self) -> &str;
}
