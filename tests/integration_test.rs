//! Integration tests for docrag
//!
//! These drive the full pipeline with the hashed embedding backend and
//! in-process generation providers, so no network access is needed.

use docrag::{
    config::{BackendConfig, ChunkingConfig, Config, RetrievalConfig},
    content::{DocumentSource, FolderSource},
    embedding::{create_backend, EmbeddingBackend, EmbeddingError, EmbeddingResult},
    generation::{ChatMessage, GenerationError, GenerationProvider, GenerationResult, ProviderRegistry},
    pipeline::{GenerationOutcome, NO_CONTEXT_PLACEHOLDER},
    retrieval::TermOverlapReranker,
    routing::{classify_query, ModelCatalog, ModelPreference, ModelProfile, ProviderKind, QueryCategory},
    AskOptions, Document, Embedding, KnowledgeBase, RagPipeline,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tempfile::TempDir;

/// Replies with the prompt it was given
struct EchoProvider;

impl GenerationProvider for EchoProvider {
    fn complete(&self, _profile: &ModelProfile, messages: &[ChatMessage]) -> GenerationResult<String> {
        Ok(messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join("\n"))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Always fails and counts attempts
#[derive(Default)]
struct DownProvider {
    attempts: Mutex<usize>,
}

impl GenerationProvider for DownProvider {
    fn complete(&self, profile: &ModelProfile, _messages: &[ChatMessage]) -> GenerationResult<String> {
        *self.attempts.lock() += 1;
        Err(GenerationError::MissingCredential {
            provider: profile.provider,
        })
    }

    fn name(&self) -> &str {
        "down"
    }
}

#[derive(Debug)]
struct UnreachableEmbeddings;

impl EmbeddingBackend for UnreachableEmbeddings {
    fn embed(&self, _text: &str) -> EmbeddingResult<Embedding> {
        Err(EmbeddingError::EmbeddingFailed("connection refused".to_string()))
    }

    fn dimensions(&self) -> usize {
        64
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

fn hashed_backend() -> Arc<dyn EmbeddingBackend> {
    create_backend(&BackendConfig::Hashed { dimensions: 256 }).unwrap()
}

fn profile(kind: ProviderKind) -> ModelProfile {
    ModelProfile {
        provider: kind,
        model: format!("{}-test", kind),
        credential: Some("test-key".to_string()),
        temperature: 0.1,
        max_tokens: 400,
    }
}

fn catalog() -> ModelCatalog {
    ModelCatalog::new(
        profile(ProviderKind::Groq),
        profile(ProviderKind::OpenAi),
        ProviderKind::Groq,
    )
}

fn echo_registry() -> ProviderRegistry {
    ProviderRegistry::new()
        .with_provider(ProviderKind::Groq, Arc::new(EchoProvider))
        .with_provider(ProviderKind::OpenAi, Arc::new(EchoProvider))
}

fn knowledge_base(documents: &[Document]) -> KnowledgeBase {
    KnowledgeBase::build(
        documents,
        ChunkingConfig {
            max_words: 40,
            overlap_words: 5,
        },
        hashed_backend(),
        RetrievalConfig::default(),
    )
    .unwrap()
}

fn three_chunk_corpus() -> Vec<Document> {
    vec![
        Document::new("ownership.txt", "Ownership means each value has a single owner and is dropped when the owner goes out of scope."),
        Document::new("borrowing.txt", "Borrowing lets code use a value through references without taking ownership of it."),
        Document::new("lifetimes.txt", "Lifetimes describe how long references stay valid so the compiler can reject dangling pointers."),
    ]
}

#[test]
fn test_empty_corpus_answers_with_placeholder_context() {
    let pipeline = RagPipeline::new(knowledge_base(&[]), catalog(), echo_registry());
    let answer = pipeline.ask("What is ownership?", &AskOptions::default());

    assert!(answer.evidence.is_empty());
    assert_eq!(answer.context, NO_CONTEXT_PLACEHOLDER);
    assert!(answer.text.contains(NO_CONTEXT_PLACEHOLDER));
    assert_eq!(answer.outcome, GenerationOutcome::Primary(ProviderKind::Groq));
}

#[test]
fn test_three_chunks_with_k_five_returns_all_three() {
    let kb = knowledge_base(&three_chunk_corpus());
    assert_eq!(kb.len(), 3);
    assert_eq!(kb.search("references", 5).unwrap().len(), 3);

    let pipeline = RagPipeline::new(kb, catalog(), echo_registry());
    let answer = pipeline.ask("references", &AskOptions::default().with_top_k(5));
    assert_eq!(answer.evidence.len(), 3);

    let mut texts: Vec<&str> = answer.evidence.iter().map(|e| e.text()).collect();
    texts.sort_unstable();
    texts.dedup();
    assert_eq!(texts.len(), 3, "evidence must not repeat a chunk");
}

#[test]
fn test_context_is_evidence_joined_in_rank_order() {
    let pipeline = RagPipeline::new(knowledge_base(&three_chunk_corpus()), catalog(), echo_registry());
    let answer = pipeline.ask("dangling references", &AskOptions::default().with_top_k(2));
    let expected: Vec<&str> = answer.evidence.iter().map(|e| e.text()).collect();
    assert_eq!(answer.context, expected.join("\n\n"));
    assert!(answer.evidence.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(answer.text.contains("Question:\ndangling references"));
}

#[test]
fn test_primary_failure_triggers_exactly_one_fallback() {
    let groq = Arc::new(DownProvider::default());
    let registry = ProviderRegistry::new()
        .with_provider(ProviderKind::Groq, groq.clone())
        .with_provider(ProviderKind::OpenAi, Arc::new(EchoProvider));
    let pipeline = RagPipeline::new(knowledge_base(&three_chunk_corpus()), catalog(), registry);

    let answer = pipeline.ask("ownership", &AskOptions::default());
    assert_eq!(answer.outcome, GenerationOutcome::Fallback(ProviderKind::OpenAi));
    assert_eq!(*groq.attempts.lock(), 1);
    assert!(answer.text.contains("ownership"));
}

#[test]
fn test_both_providers_down_still_returns_evidence() {
    let groq = Arc::new(DownProvider::default());
    let openai = Arc::new(DownProvider::default());
    let registry = ProviderRegistry::new()
        .with_provider(ProviderKind::Groq, groq.clone())
        .with_provider(ProviderKind::OpenAi, openai.clone());
    let pipeline = RagPipeline::new(knowledge_base(&three_chunk_corpus()), catalog(), registry);

    let options = AskOptions::default().with_preference(ModelPreference::Provider(ProviderKind::OpenAi));
    let answer = pipeline.ask("borrowing", &options);

    assert_eq!(answer.outcome, GenerationOutcome::Failed);
    assert!(answer.text.contains("No API key configured for openai"));
    assert!(answer.text.contains("GROQ_API_KEY"));
    assert!(answer.text.contains("OPENAI_API_KEY"));
    assert!(!answer.evidence.is_empty());
    assert_eq!(*openai.attempts.lock(), 1);
    assert_eq!(*groq.attempts.lock(), 1);
}

#[test]
fn test_embedding_outage_degrades_to_lexical_evidence() {
    let kb = KnowledgeBase::build(
        &three_chunk_corpus(),
        ChunkingConfig::default(),
        Arc::new(UnreachableEmbeddings),
        RetrievalConfig::default(),
    )
    .unwrap();
    let pipeline = RagPipeline::new(kb, catalog(), echo_registry());

    // The embedding reranker fails too, so the hybrid order is kept.
    let answer = pipeline.ask("Lifetimes", &AskOptions::default().with_top_k(1));
    assert_eq!(answer.evidence.len(), 1);
    assert!(answer.evidence[0].text().starts_with("Lifetimes"));
}

#[test]
fn test_term_overlap_reranker_in_pipeline() {
    let pipeline = RagPipeline::new(knowledge_base(&three_chunk_corpus()), catalog(), echo_registry())
        .with_reranker(Box::new(TermOverlapReranker));
    let answer = pipeline.ask("single owner", &AskOptions::default().with_top_k(1));
    assert_eq!(answer.evidence[0].chunk.document_id, "ownership.txt");
}

#[test]
fn test_folder_source_feeds_knowledge_base() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("notes.txt"), "Page 1 of 1\nTraits define shared behavior.").unwrap();
    std::fs::write(tmp.path().join("readme.md"), "Generics abstract over types.").unwrap();
    std::fs::write(tmp.path().join("image.png"), [0u8, 1, 2, 3]).unwrap();

    let documents = FolderSource::new(tmp.path()).documents().unwrap();
    assert_eq!(documents.len(), 2);

    let kb = knowledge_base(&documents);
    assert_eq!(kb.len(), 2);
    assert!(kb.chunks().iter().all(|c| !c.content.contains("Page")));
    assert_eq!(kb.search("Traits", 1).unwrap()[0].chunk.document_id, "notes.txt");
}

#[test]
fn test_pipeline_from_config_indexes_documents() {
    let config = Config::from_toml(
        r#"
        [chunking]
        max_words = 10
        overlap_words = 2

        [retrieval]
        reranker = "term_overlap"
        "#,
    )
    .unwrap();
    let pipeline = RagPipeline::from_config(&config, &three_chunk_corpus()).unwrap();
    assert!(pipeline.knowledge_base().len() > 3);
}

#[test]
fn test_invalid_chunking_config_is_rejected() {
    let result = Config::from_toml("[chunking]\nmax_words = 5\noverlap_words = 5\n");
    let message = result.unwrap_err().to_string();
    assert!(message.contains("overlap_words"));
}

#[test]
fn test_classifier_rule_order() {
    assert_eq!(classify_query("What is a binary tree?"), QueryCategory::Definition);
    assert_eq!(classify_query("Summarize this vs that"), QueryCategory::Comparison);
    assert_eq!(classify_query("What is a summary vs an abstract?"), QueryCategory::Definition);
    assert_eq!(classify_query("Compare and summarize"), QueryCategory::Comparison);
    assert_eq!(classify_query("Summary please?"), QueryCategory::Summarization);
    assert_eq!(classify_query("Why?"), QueryCategory::Question);
    assert_eq!(classify_query("tell me about traits"), QueryCategory::General);
}
