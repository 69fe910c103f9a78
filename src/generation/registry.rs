//! Provider lookup by kind

use super::http::ChatCompletionsProvider;
use super::provider::{GenerationError, GenerationProvider, GenerationResult};
use crate::config::GenerationConfig;
use crate::routing::ProviderKind;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps each [`ProviderKind`] to the client that serves it
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// HTTP clients for Groq and OpenAI from `[generation]`
    pub fn from_config(config: &GenerationConfig) -> GenerationResult<Self> {
        let mut registry = Self::new();
        for kind in [ProviderKind::Groq, ProviderKind::OpenAi] {
            let provider = ChatCompletionsProvider::new(
                kind.as_str(),
                config.provider(kind).endpoint.clone(),
                config.timeout_secs,
            )?;
            registry.register(kind, Arc::new(provider));
        }
        Ok(registry)
    }

    pub fn register(&mut self, kind: ProviderKind, provider: Arc<dyn GenerationProvider>) {
        self.providers.insert(kind, provider);
    }

    pub fn with_provider(mut self, kind: ProviderKind, provider: Arc<dyn GenerationProvider>) -> Self {
        self.register(kind, provider);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> GenerationResult<Arc<dyn GenerationProvider>> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or(GenerationError::UnknownProvider(kind))
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.providers.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("ProviderRegistry").field("providers", &kinds).finish()
    }
}
