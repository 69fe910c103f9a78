//! Second-pass reranking of merged candidates

use crate::config::RerankerKind;
use crate::embedding::{cosine_similarity, EmbeddingBackend};
use crate::error::RagResult;
use crate::types::{RetrievalMethod, ScoredChunk};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reorders a candidate set against the query
///
/// Implementations return at most `min(top_k, candidates.len())` results,
/// best first, and return an empty list for empty input.
pub trait Reranker: Send + Sync {
    fn rerank(&self, query: &str, candidates: Vec<ScoredChunk>, top_k: usize) -> RagResult<Vec<ScoredChunk>>;
}

/// Build the configured reranker
pub fn create_reranker(kind: RerankerKind, backend: Arc<dyn EmbeddingBackend>) -> Box<dyn Reranker> {
    match kind {
        RerankerKind::Embedding => Box::new(EmbeddingReranker::new(backend)),
        RerankerKind::TermOverlap => Box::new(TermOverlapReranker),
    }
}

fn sort_and_truncate(mut results: Vec<ScoredChunk>, top_k: usize) -> Vec<ScoredChunk> {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(top_k);
    results
}

/// Scores each candidate by cosine similarity to the query embedding
#[derive(Debug, Clone)]
pub struct EmbeddingReranker {
    backend: Arc<dyn EmbeddingBackend>,
}

impl EmbeddingReranker {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self { backend }
    }
}

impl Reranker for EmbeddingReranker {
    fn rerank(&self, query: &str, candidates: Vec<ScoredChunk>, top_k: usize) -> RagResult<Vec<ScoredChunk>> {
        if candidates.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        debug!("Reranking {} candidates", candidates.len());

        let query_vector = self.backend.embed(query)?;
        let texts: Vec<String> = candidates.iter().map(|c| c.chunk.content.clone()).collect();
        let vectors = self.backend.embed_batch(&texts)?;

        let rescored = candidates
            .into_iter()
            .zip(vectors)
            .map(|(mut candidate, vector)| -> RagResult<ScoredChunk> {
                candidate.score = cosine_similarity(&query_vector, &vector)?;
                candidate.method = RetrievalMethod::Rerank;
                Ok(candidate)
            })
            .collect::<RagResult<Vec<_>>>()?;

        Ok(sort_and_truncate(rescored, top_k))
    }
}

/// Blends the inherited score with the fraction of query terms present
///
/// `0.7 * score + 0.3 * overlap`, case-insensitive, no model calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermOverlapReranker;

impl Reranker for TermOverlapReranker {
    fn rerank(&self, query: &str, candidates: Vec<ScoredChunk>, top_k: usize) -> RagResult<Vec<ScoredChunk>> {
        let query_lower = query.to_lowercase();
        let query_terms: HashSet<&str> = query_lower.split_whitespace().collect();

        let rescored = candidates
            .into_iter()
            .map(|mut candidate| {
                let content_lower = candidate.chunk.content.to_lowercase();
                let overlap = query_terms
                    .iter()
                    .filter(|term| content_lower.contains(*term))
                    .count();
                let overlap_boost = overlap as f32 / query_terms.len().max(1) as f32;
                candidate.score = candidate.score * 0.7 + overlap_boost * 0.3;
                candidate.method = RetrievalMethod::Rerank;
                candidate
            })
            .collect();

        Ok(sort_and_truncate(rescored, top_k))
    }
}
