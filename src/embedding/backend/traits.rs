//! Embedding backend trait definitions

use crate::types::Embedding;
use std::fmt::Debug;

/// Errors that can occur during embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Embedding generation failed
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// Rate limited by the API
    #[error("Rate limited, retry after {retry_after_ms:?}ms")]
    RateLimited {
        /// Suggested retry delay in milliseconds, if provided by the API
        retry_after_ms: Option<u64>,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Vectors of different lengths were compared or stored together
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Core trait for embedding backends
///
/// Object-safe so retrievers, rerankers and the answer validator can share
/// one `Arc<dyn EmbeddingBackend>`.
pub trait EmbeddingBackend: Send + Sync + Debug {
    /// Generate embedding for a single text
    fn embed(&self, text: &str) -> EmbeddingResult<Embedding>;

    /// Generate embeddings for a batch of texts
    ///
    /// The default implementation calls `embed` for each text.
    fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Embedding>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Embedding dimensions
    fn dimensions(&self) -> usize;

    /// Backend name (e.g., "hashed", "http")
    fn name(&self) -> &str;
}
