//! Generation provider configuration

use crate::routing::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_generation_timeout() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    400
}

/// Settings for one chat-completions backend
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// API key; when absent the `api_key_env` variable is consulted
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ProviderConfig {
    pub fn groq() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key: None,
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn openai() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    /// Resolve the credential from config or environment. Blank values count as missing.
    pub fn resolve_credential(&self) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(present)
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(present))
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Generation configuration
///
/// ```toml
/// [generation]
/// default_provider = "groq"
/// timeout_secs = 60
///
/// [generation.routes]
/// summarization = "openai"
///
/// [generation.openai]
/// endpoint = "https://api.openai.com/v1/chat/completions"
/// model = "gpt-4o-mini"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider used for `auto` routing when no category route matches
    #[serde(default)]
    pub default_provider: ProviderKind,
    /// Request timeout in seconds for every provider call
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    /// Optional per-category provider for `auto` routing, keyed by category name
    #[serde(default)]
    pub routes: BTreeMap<String, ProviderKind>,
    #[serde(default = "ProviderConfig::groq")]
    pub groq: ProviderConfig,
    #[serde(default = "ProviderConfig::openai")]
    pub openai: ProviderConfig,
}

impl GenerationConfig {
    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Groq => &self.groq,
            ProviderKind::OpenAi => &self.openai,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::default(),
            timeout_secs: default_generation_timeout(),
            routes: BTreeMap::new(),
            groq: ProviderConfig::groq(),
            openai: ProviderConfig::openai(),
        }
    }
}
