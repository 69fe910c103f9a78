//! The `ask` entry point

use super::knowledge_base::KnowledgeBase;
use super::prompt::{assemble_context, build_prompt};
use super::validator::{AnswerValidator, GroundingReport};
use crate::config::Config;
use crate::embedding::create_backend;
use crate::error::{RagError, RagResult};
use crate::generation::{ChatMessage, GenerationError, ProviderRegistry};
use crate::retrieval::{create_reranker, Reranker};
use crate::routing::{classify_query, ModelCatalog, ModelPreference, ModelProfile, ProviderKind, QueryCategory};
use crate::types::{Document, ScoredChunk};
use crate::util::truncate_str;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Request-scoped settings for one [`RagPipeline::ask`] call
#[derive(Debug, Clone, PartialEq)]
pub struct AskOptions {
    /// Number of evidence chunks in the final context
    pub top_k: usize,
    pub preference: ModelPreference,
    /// Overrides the selected profile's temperature
    pub temperature: Option<f32>,
    /// Overrides the selected profile's max_tokens
    pub max_tokens: Option<u32>,
    /// Run the second-pass reranker; when false candidates are truncated
    pub rerank: bool,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            preference: ModelPreference::Auto,
            temperature: None,
            max_tokens: None,
            rerank: true,
        }
    }
}

impl AskOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_preference(mut self, preference: ModelPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_rerank(mut self, rerank: bool) -> Self {
        self.rerank = rerank;
        self
    }
}

/// Which provider produced the answer text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "provider", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Primary(ProviderKind),
    Fallback(ProviderKind),
    /// Both providers failed; the answer text describes the failures
    Failed,
}

/// Result of one `ask`
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    /// Final ranked evidence, best first, no duplicate texts
    pub evidence: Vec<ScoredChunk>,
    pub category: QueryCategory,
    /// Exact context string given to the model
    pub context: String,
    pub outcome: GenerationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding: Option<GroundingReport>,
}

/// Retrieval, reranking and generation over one knowledge base
pub struct RagPipeline {
    knowledge_base: KnowledgeBase,
    catalog: ModelCatalog,
    providers: ProviderRegistry,
    reranker: Box<dyn Reranker>,
    validator: Option<AnswerValidator>,
}

impl RagPipeline {
    pub fn new(
        knowledge_base: KnowledgeBase,
        catalog: ModelCatalog,
        providers: ProviderRegistry,
    ) -> Self {
        let retrieval = knowledge_base.retrieval_config();
        let backend = knowledge_base.backend().clone();
        let reranker = create_reranker(retrieval.reranker, backend.clone());
        let validator = retrieval
            .validate_answers
            .then(|| AnswerValidator::new(backend));
        Self {
            knowledge_base,
            catalog,
            providers,
            reranker,
            validator,
        }
    }

    /// Build every component from configuration and index `documents`
    pub fn from_config(config: &Config, documents: &[Document]) -> RagResult<Self> {
        let backend = create_backend(&config.embedding)?;
        let knowledge_base = KnowledgeBase::build(
            documents,
            config.chunking.clone(),
            backend,
            config.retrieval.clone(),
        )?;
        let catalog = ModelCatalog::from_config(&config.generation)?;
        let providers = ProviderRegistry::from_config(&config.generation)
            .map_err(|e| RagError::Configuration(e.to_string()))?;
        Ok(Self::new(knowledge_base, catalog, providers))
    }

    pub fn with_reranker(mut self, reranker: Box<dyn Reranker>) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn with_validator(mut self, validator: Option<AnswerValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Mutable access for reindexing between requests
    pub fn knowledge_base_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge_base
    }

    /// Answer `query` from the indexed documents
    ///
    /// Never fails: retrieval problems shrink the evidence list and provider
    /// failures are reported in the answer text.
    pub fn ask(&self, query: &str, options: &AskOptions) -> Answer {
        let category = classify_query(query);
        let profile = self
            .catalog
            .select_model(category, options.preference)
            .with_overrides(options.temperature, options.max_tokens);

        info!(
            "Answering {} query '{}' with {} ({})",
            category,
            truncate_str(query, 80),
            profile.provider,
            profile.model
        );

        let evidence = self.retrieve(query, options);
        let context = assemble_context(&evidence);
        let messages = [ChatMessage::user(build_prompt(query, &context))];
        let (text, outcome) = self.generate(&profile, options, &messages);

        let grounding = match (&self.validator, outcome) {
            (Some(validator), GenerationOutcome::Primary(_) | GenerationOutcome::Fallback(_)) => {
                let contexts: Vec<String> = evidence.iter().map(|e| e.text().to_string()).collect();
                match validator.validate(&text, &contexts) {
                    Ok(report) => Some(report),
                    Err(e) => {
                        warn!("Answer validation failed: {}", e);
                        None
                    }
                }
            }
            _ => None,
        };

        Answer {
            text,
            evidence,
            category,
            context,
            outcome,
            grounding,
        }
    }

    /// Hybrid candidates, reranked down to `top_k`
    fn retrieve(&self, query: &str, options: &AskOptions) -> Vec<ScoredChunk> {
        if options.top_k == 0 {
            return Vec::new();
        }

        let candidate_k = options
            .top_k
            .max(self.knowledge_base.retrieval_config().candidate_count);
        let mut candidates = match self.knowledge_base.search(query, candidate_k) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Retrieval failed, answering without context: {}", e);
                return Vec::new();
            }
        };
        debug!("Retrieved {} candidates", candidates.len());

        if options.rerank {
            match self.reranker.rerank(query, candidates.clone(), options.top_k) {
                Ok(reranked) => return reranked,
                Err(e) => warn!("Reranking failed, keeping hybrid order: {}", e),
            }
        }

        candidates.truncate(options.top_k);
        candidates
    }

    /// One attempt with the selected profile, one with the alternate provider
    fn generate(
        &self,
        profile: &ModelProfile,
        options: &AskOptions,
        messages: &[ChatMessage],
    ) -> (String, GenerationOutcome) {
        let primary_error = match self.complete(profile, messages) {
            Ok(text) => return (text, GenerationOutcome::Primary(profile.provider)),
            Err(e) => e,
        };

        let alternate = profile.provider.alternate();
        warn!(
            "{} generation failed, falling back to {}: {}",
            profile.provider, alternate, primary_error
        );

        let fallback = self
            .catalog
            .profile(alternate)
            .with_overrides(options.temperature, options.max_tokens);
        match self.complete(&fallback, messages) {
            Ok(text) => (text, GenerationOutcome::Fallback(alternate)),
            Err(fallback_error) => {
                warn!("{} fallback failed: {}", alternate, fallback_error);
                let exhausted = RagError::Generation(format!(
                    "{}: {}; {}: {}",
                    profile.provider, primary_error, alternate, fallback_error
                ));
                let text = format!("{}. Check your GROQ_API_KEY and OPENAI_API_KEY.", exhausted);
                (text, GenerationOutcome::Failed)
            }
        }
    }

    fn complete(&self, profile: &ModelProfile, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        self.providers.get(profile.provider)?.complete(profile, messages)
    }
}
