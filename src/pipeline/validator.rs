//! Grounding check for generated answers

use crate::embedding::{cosine_similarity, EmbeddingBackend};
use crate::error::RagResult;
use serde::Serialize;
use std::sync::Arc;

/// How closely an answer tracks the evidence it was generated from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GroundingReport {
    pub max_similarity: f32,
    pub avg_similarity: f32,
}

/// Compares answer and context embeddings
#[derive(Debug, Clone)]
pub struct AnswerValidator {
    backend: Arc<dyn EmbeddingBackend>,
}

impl AnswerValidator {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self { backend }
    }

    /// Max and mean cosine similarity between `answer` and each context.
    /// Both are zero when there are no contexts.
    pub fn validate(&self, answer: &str, contexts: &[String]) -> RagResult<GroundingReport> {
        if contexts.is_empty() {
            return Ok(GroundingReport::default());
        }

        let answer_vector = self.backend.embed(answer)?;
        let context_vectors = self.backend.embed_batch(contexts)?;

        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0;
        for vector in &context_vectors {
            let similarity = cosine_similarity(&answer_vector, vector)?;
            max = max.max(similarity);
            sum += similarity;
        }

        Ok(GroundingReport {
            max_similarity: max,
            avg_similarity: sum / context_vectors.len() as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::backend::HashedBackend;

    fn validator() -> AnswerValidator {
        AnswerValidator::new(Arc::new(HashedBackend::new(256).unwrap()))
    }

    #[test]
    fn test_no_contexts_reports_zero() {
        let report = validator().validate("anything", &[]).unwrap();
        assert_eq!(report, GroundingReport::default());
    }

    #[test]
    fn test_identical_context_is_fully_grounded() {
        let report = validator()
            .validate(
                "rust guarantees memory safety",
                &[
                    "rust guarantees memory safety".to_string(),
                    "bananas are yellow".to_string(),
                ],
            )
            .unwrap();
        assert!((report.max_similarity - 1.0).abs() < 1e-5);
        assert!(report.avg_similarity < report.max_similarity);
    }
}
