//! Error taxonomy for the retrieval and generation pipeline
//!
//! Only [`RagError::Configuration`] is meant to reach callers as a hard
//! failure. Retrieval errors are recovered one level up by the orchestrator,
//! and an exhausted provider fallback is rendered from a
//! [`RagError::Generation`] into the answer text.

use crate::embedding::backend::EmbeddingError;

/// Errors raised by the retrieval core
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// Invalid parameters, e.g. a chunk overlap that is not smaller than the chunk length
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An index or search primitive failed (embedding service down, store error, ...)
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Generation failed after the provider fallback was exhausted
    #[error("Generation failed: {0}")]
    Generation(String),
}

impl RagError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<EmbeddingError> for RagError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Config(msg) => Self::Configuration(msg),
            other => Self::Retrieval(other.to_string()),
        }
    }
}

/// Result type for the retrieval core
pub type RagResult<T> = Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_errors_become_retrieval_errors() {
        let err: RagError = EmbeddingError::EmbeddingFailed("boom".to_string()).into();
        assert!(matches!(err, RagError::Retrieval(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_generation_error_display() {
        let err = RagError::Generation("groq: timeout; openai: 401".to_string());
        assert_eq!(err.to_string(), "Generation failed: groq: timeout; openai: 401");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_embedding_config_errors_stay_configuration_errors() {
        let err: RagError = EmbeddingError::Config("bad key".to_string()).into();
        assert!(err.is_configuration());
    }
}
