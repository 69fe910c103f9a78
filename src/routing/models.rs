//! Model profiles and provider selection

use super::QueryCategory;
use crate::config::{GenerationConfig, ProviderConfig};
use crate::error::{RagError, RagResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Hosted chat-completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// The provider tried when this one fails
    pub fn alternate(self) -> Self {
        match self {
            Self::Groq => Self::OpenAi,
            Self::OpenAi => Self::Groq,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown provider '{}' (expected groq or openai)", other)),
        }
    }
}

/// Caller's model choice for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelPreference {
    /// Route by query category
    #[default]
    Auto,
    Provider(ProviderKind),
}

impl FromStr for ModelPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse::<ProviderKind>()
            .map(Self::Provider)
            .map_err(|_| format!("unknown model preference '{}' (expected auto, groq or openai)", s))
    }
}

impl fmt::Display for ModelPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Provider(kind) => kind.fmt(f),
        }
    }
}

/// Everything needed to call one model
#[derive(Clone, PartialEq)]
pub struct ModelProfile {
    pub provider: ProviderKind,
    pub model: String,
    pub credential: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ModelProfile {
    /// Profile for `kind` with the credential resolved from config or environment
    pub fn from_config(kind: ProviderKind, config: &ProviderConfig) -> Self {
        Self {
            provider: kind,
            model: config.model.clone(),
            credential: config.resolve_credential(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Copy with request-scoped sampling overrides applied
    pub fn with_overrides(&self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        Self {
            temperature: temperature.unwrap_or(self.temperature),
            max_tokens: max_tokens.unwrap_or(self.max_tokens),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ModelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProfile")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// One profile per provider plus the category routes used for `auto`
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    groq: ModelProfile,
    openai: ModelProfile,
    default_provider: ProviderKind,
    routes: HashMap<QueryCategory, ProviderKind>,
}

impl ModelCatalog {
    pub fn new(groq: ModelProfile, openai: ModelProfile, default_provider: ProviderKind) -> Self {
        Self {
            groq,
            openai,
            default_provider,
            routes: HashMap::new(),
        }
    }

    /// Build from `[generation]`, resolving credentials once
    pub fn from_config(config: &GenerationConfig) -> RagResult<Self> {
        let mut catalog = Self::new(
            ModelProfile::from_config(ProviderKind::Groq, &config.groq),
            ModelProfile::from_config(ProviderKind::OpenAi, &config.openai),
            config.default_provider,
        );
        for (category, provider) in &config.routes {
            let category = category
                .parse::<QueryCategory>()
                .map_err(RagError::Configuration)?;
            catalog = catalog.with_route(category, *provider);
        }

        for kind in [ProviderKind::Groq, ProviderKind::OpenAi] {
            if !catalog.profile(kind).has_credential() {
                debug!(
                    "No credential for {} (set {})",
                    kind,
                    config.provider(kind).api_key_env
                );
            }
        }
        Ok(catalog)
    }

    /// Send `auto` requests of `category` to `provider`
    pub fn with_route(mut self, category: QueryCategory, provider: ProviderKind) -> Self {
        self.routes.insert(category, provider);
        self
    }

    pub fn profile(&self, kind: ProviderKind) -> &ModelProfile {
        match kind {
            ProviderKind::Groq => &self.groq,
            ProviderKind::OpenAi => &self.openai,
        }
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Pick the profile for a request
    ///
    /// `Auto` resolves through the category routes, then the default provider.
    /// The resolved provider is used when it has a credential; otherwise the
    /// alternate is used if it has one. With neither credential available the
    /// resolved provider's profile is returned as-is so the call fails loudly
    /// at generation time.
    pub fn select_model(&self, category: QueryCategory, preference: ModelPreference) -> ModelProfile {
        let requested = match preference {
            ModelPreference::Auto => self
                .routes
                .get(&category)
                .copied()
                .unwrap_or(self.default_provider),
            ModelPreference::Provider(kind) => kind,
        };

        let primary = self.profile(requested);
        if primary.has_credential() {
            debug!("Selected {} ({}) for {} query", requested, primary.model, category);
            return primary.clone();
        }

        let alternate = self.profile(requested.alternate());
        if alternate.has_credential() {
            warn!(
                "No credential for {}, switching to {}",
                requested,
                requested.alternate()
            );
            return alternate.clone();
        }

        warn!("No credential configured for either provider");
        primary.clone()
    }
}
