//! Chunking and retrieval configuration

use serde::{Deserialize, Serialize};

/// Chunking configuration
///
/// Chunks are fixed-size word windows; consecutive windows share
/// `overlap_words` words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in words
    pub max_words: usize,
    /// Words shared by consecutive chunks (must be < max_words)
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: 700,
            overlap_words: 150,
        }
    }
}

/// How each retriever's scores are mapped onto a shared scale before merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreNormalization {
    /// Per-query min-max scaling into [0, 1]
    #[default]
    MinMax,
    /// Rank-based: the i-th of n results scores (n - i) / n
    Rank,
    /// Raw scores, compared as-is across retrievers
    Raw,
}

/// Key used to detect duplicate chunks during the hybrid merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    /// Raw chunk text
    #[default]
    Exact,
    /// Chunk text trimmed with internal whitespace collapsed
    Whitespace,
}

/// Second-pass relevance scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankerKind {
    /// Cosine similarity between query and candidate embeddings
    #[default]
    Embedding,
    /// Blend of the inherited score with query-term overlap
    TermOverlap,
}

/// Retrieval configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum number of candidates the hybrid stage hands to the reranker
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,
    /// Minimum number of results requested from each sub-retriever
    #[serde(default = "default_min_fetch")]
    pub min_fetch: usize,
    /// Score normalization applied before the hybrid merge
    #[serde(default)]
    pub normalization: ScoreNormalization,
    /// Duplicate detection key for the hybrid merge
    #[serde(default)]
    pub dedup: DedupKey,
    /// Run lexical and semantic lookups on separate threads
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Reranker used after the hybrid merge
    #[serde(default)]
    pub reranker: RerankerKind,
    /// Compute a grounding report for generated answers
    #[serde(default)]
    pub validate_answers: bool,
    /// BM25 term-frequency saturation
    #[serde(default = "default_bm25_k1")]
    pub bm25_k1: f32,
    /// BM25 length normalization
    #[serde(default = "default_bm25_b")]
    pub bm25_b: f32,
    /// Floor for negative IDF values, as a fraction of the average IDF
    #[serde(default = "default_bm25_epsilon")]
    pub bm25_epsilon: f32,
}

fn default_candidate_count() -> usize {
    10
}

fn default_min_fetch() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_bm25_k1() -> f32 {
    1.5
}

fn default_bm25_b() -> f32 {
    0.75
}

fn default_bm25_epsilon() -> f32 {
    0.25
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
            min_fetch: default_min_fetch(),
            normalization: ScoreNormalization::default(),
            dedup: DedupKey::default(),
            parallel: true,
            reranker: RerankerKind::default(),
            validate_answers: false,
            bm25_k1: default_bm25_k1(),
            bm25_b: default_bm25_b(),
            bm25_epsilon: default_bm25_epsilon(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_retrieval_section_uses_defaults() {
        let config: RetrievalConfig =
            toml::from_str("normalization = \"rank\"\ndedup = \"whitespace\"").unwrap();
        assert_eq!(config.normalization, ScoreNormalization::Rank);
        assert_eq!(config.dedup, DedupKey::Whitespace);
        assert_eq!(config.candidate_count, 10);
        assert!(config.parallel);
        assert_eq!(config.reranker, RerankerKind::Embedding);
    }
}
