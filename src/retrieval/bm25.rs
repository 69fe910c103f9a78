//! BM25 Okapi lexical scoring
//!
//! Tokens are whitespace-split and case-sensitive. Terms that occur in more
//! than half of the corpus get a negative IDF, which is replaced by
//! `epsilon * average_idf` so common words never push a score down.

use super::Retriever;
use crate::config::RetrievalConfig;
use crate::error::RagResult;
use crate::types::{Chunk, RetrievalMethod, ScoredChunk};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// BM25 parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
        }
    }
}

impl From<&RetrievalConfig> for Bm25Params {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            k1: config.bm25_k1 as f64,
            b: config.bm25_b as f64,
            epsilon: config.bm25_epsilon as f64,
        }
    }
}

/// In-memory BM25 index over a chunk sequence
#[derive(Debug, Clone, Default)]
pub struct Bm25Retriever {
    params: Bm25Params,
    chunks: Vec<Chunk>,
    /// Per-chunk term frequencies
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avg_doc_len: f64,
    idf: HashMap<String, f64>,
}

impl Bm25Retriever {
    pub fn new(params: Bm25Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Rebuild all statistics from `chunks`, replacing any previous index
    pub fn index(&mut self, chunks: &[Chunk]) {
        self.chunks = chunks.to_vec();
        self.term_freqs = Vec::with_capacity(chunks.len());
        self.doc_lens = Vec::with_capacity(chunks.len());
        self.idf.clear();

        let mut doc_freqs: HashMap<&str, usize> = HashMap::new();
        for chunk in chunks {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            let mut len = 0;
            for token in chunk.content.split_whitespace() {
                *freqs.entry(token.to_string()).or_default() += 1;
                len += 1;
            }
            self.doc_lens.push(len);
            self.term_freqs.push(freqs);
        }
        for freqs in &self.term_freqs {
            for term in freqs.keys() {
                *doc_freqs.entry(term.as_str()).or_default() += 1;
            }
        }

        let n = chunks.len() as f64;
        let total: usize = self.doc_lens.iter().sum();
        self.avg_doc_len = if chunks.is_empty() {
            0.0
        } else {
            total as f64 / n
        };

        let mut idf_sum = 0.0;
        let mut negative = Vec::new();
        let mut idf = HashMap::with_capacity(doc_freqs.len());
        for (term, df) in doc_freqs {
            let df = df as f64;
            let value = ((n - df + 0.5) / (df + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative.push(term.to_string());
            }
            idf.insert(term.to_string(), value);
        }
        if !idf.is_empty() {
            let floor = self.params.epsilon * idf_sum / idf.len() as f64;
            for term in negative {
                idf.insert(term, floor);
            }
        }
        self.idf = idf;

        debug!(
            "BM25 indexed {} chunks, {} distinct terms, avg length {:.1}",
            self.chunks.len(),
            self.idf.len(),
            self.avg_doc_len
        );
    }

    /// BM25 score of every indexed chunk, in chunk order
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let Bm25Params { k1, b, .. } = self.params;
        let mut scores = vec![0.0; self.chunks.len()];
        if self.avg_doc_len == 0.0 {
            return scores;
        }

        // Repeated query tokens contribute once per occurrence.
        for token in query.split_whitespace() {
            let Some(idf) = self.idf.get(token) else {
                continue;
            };
            for (i, freqs) in self.term_freqs.iter().enumerate() {
                let tf = freqs.get(token).copied().unwrap_or(0) as f64;
                if tf == 0.0 {
                    continue;
                }
                let length_norm = 1.0 - b + b * self.doc_lens[i] as f64 / self.avg_doc_len;
                scores[i] += idf * (tf * (k1 + 1.0)) / (tf + k1 * length_norm);
            }
        }
        scores
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }
}

impl Retriever for Bm25Retriever {
    fn search(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<(usize, f64)> = self.scores(query).into_iter().enumerate().collect();
        // Stable: equal scores keep chunk order.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(k);

        debug!("BM25 search: {} results", ranked.len());
        Ok(ranked
            .into_iter()
            .map(|(i, score)| {
                ScoredChunk::new(self.chunks[i].clone(), score as f32, RetrievalMethod::Lexical)
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn method(&self) -> RetrievalMethod {
        RetrievalMethod::Lexical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new("doc.txt", i, *t))
            .collect()
    }

    fn indexed(texts: &[&str]) -> Bm25Retriever {
        let mut bm25 = Bm25Retriever::new(Bm25Params::default());
        bm25.index(&chunks(texts));
        bm25
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let bm25 = Bm25Retriever::new(Bm25Params::default());
        assert!(bm25.is_empty());
        assert!(bm25.search("anything", 5).unwrap().is_empty());
    }

    #[test]
    fn test_returns_min_of_k_and_population() {
        let bm25 = indexed(&["a b", "c d", "e f"]);
        assert_eq!(bm25.search("a", 5).unwrap().len(), 3);
        assert_eq!(bm25.search("a", 2).unwrap().len(), 2);
        assert!(bm25.search("a", 0).unwrap().is_empty());
    }

    #[test]
    fn test_matching_chunk_ranks_first() {
        let bm25 = indexed(&[
            "the cat sat on the mat",
            "rust ownership and borrowing",
            "dogs chase cats",
        ]);
        let results = bm25.search("ownership", 3).unwrap();
        assert_eq!(results[0].chunk.position, 1);
        assert!(results[0].score > 0.0);
        assert_eq!(results[0].method, RetrievalMethod::Lexical);
    }

    #[test]
    fn test_ties_keep_chunk_order() {
        let bm25 = indexed(&["x one", "y two", "z three"]);
        let results = bm25.search("unknown", 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|r| r.chunk.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_tokenization_is_case_sensitive() {
        let bm25 = indexed(&["Rust language", "other text", "more words"]);
        assert!(bm25.idf("rust").is_none());
        assert!(bm25.idf("Rust").is_some());
    }

    #[test]
    fn test_idf_formula() {
        let bm25 = indexed(&["apple", "banana", "cherry", "date"]);
        let expected = ((4.0 - 1.0 + 0.5) / (1.0 + 0.5) as f64).ln();
        assert!((bm25.idf("apple").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_negative_idf_is_floored_by_epsilon() {
        // "common" appears in 3 of 4 chunks: ln(1.5/3.5) < 0.
        let bm25 = indexed(&["common a", "common b", "common c", "d"]);
        let idf_common = bm25.idf("common").unwrap();
        let rare = ((4.0 - 1.0 + 0.5) / 1.5f64).ln();
        let raw_common = (1.5f64 / 3.5).ln();
        let average = (raw_common + 4.0 * rare) / 5.0;
        assert!((idf_common - 0.25 * average).abs() < 1e-12);
        assert!(idf_common > 0.0);
    }

    #[test]
    fn test_query_tokens_count_with_multiplicity() {
        let bm25 = indexed(&["alpha beta", "gamma delta", "epsilon zeta"]);
        let once = bm25.scores("alpha")[0];
        let twice = bm25.scores("alpha alpha")[0];
        assert!((twice - 2.0 * once).abs() < 1e-12);
    }

    #[test]
    fn test_reindex_replaces_previous_corpus() {
        let mut bm25 = indexed(&["old text"]);
        bm25.index(&chunks(&["new", "content"]));
        assert_eq!(bm25.len(), 2);
        assert!(bm25.idf("old").is_none());
    }
}
