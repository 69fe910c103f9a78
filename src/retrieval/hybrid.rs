//! Hybrid retrieval combining lexical and semantic search

use super::fusion::{merge_and_dedup, normalize_scores};
use super::Retriever;
use crate::config::RetrievalConfig;
use crate::error::{RagError, RagResult};
use crate::types::{RetrievalMethod, ScoredChunk};
use crate::util::truncate_str;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs both retrievers, normalizes each list and merges them
pub struct HybridRetriever {
    lexical: Arc<dyn Retriever>,
    semantic: Arc<dyn Retriever>,
    config: RetrievalConfig,
}

impl HybridRetriever {
    pub fn new(
        lexical: Arc<dyn Retriever>,
        semantic: Arc<dyn Retriever>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            lexical,
            semantic,
            config,
        }
    }

    fn lookup_both(
        &self,
        query: &str,
        fetch_k: usize,
    ) -> (RagResult<Vec<ScoredChunk>>, RagResult<Vec<ScoredChunk>>) {
        if !self.config.parallel {
            return (
                self.lexical.search(query, fetch_k),
                self.semantic.search(query, fetch_k),
            );
        }

        std::thread::scope(|s| {
            let semantic = s.spawn(|| self.semantic.search(query, fetch_k));
            let lexical = self.lexical.search(query, fetch_k);
            let semantic = semantic.join().unwrap_or_else(|_| {
                Err(RagError::Retrieval("semantic lookup panicked".to_string()))
            });
            (lexical, semantic)
        })
    }
}

impl Retriever for HybridRetriever {
    fn search(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let fetch_k = k.max(self.config.min_fetch);
        let (lexical, semantic) = self.lookup_both(query, fetch_k);

        let (lexical, semantic) = match (lexical, semantic) {
            (Ok(l), Ok(s)) => (l, s),
            (Ok(l), Err(e)) => {
                warn!("Semantic retrieval failed, using lexical results only: {}", e);
                (l, Vec::new())
            }
            (Err(e), Ok(s)) => {
                warn!("Lexical retrieval failed, using semantic results only: {}", e);
                (Vec::new(), s)
            }
            (Err(le), Err(se)) => {
                return Err(RagError::Retrieval(format!(
                    "both retrievers failed (lexical: {}; semantic: {})",
                    le, se
                )));
            }
        };

        // BM25 scores every chunk; an exact zero means no query term matched.
        // Tiny corpora can give real matches negative idfs, so those stay.
        let lexical: Vec<ScoredChunk> = lexical.into_iter().filter(|r| r.score != 0.0).collect();

        debug!(
            "Hybrid search for '{}': {} lexical, {} semantic candidates",
            truncate_str(query, 50),
            lexical.len(),
            semantic.len()
        );

        let normalization = self.config.normalization;
        let merged = merge_and_dedup(
            vec![
                normalize_scores(lexical, normalization),
                normalize_scores(semantic, normalization),
            ],
            self.config.dedup,
            k,
        );

        debug!("Hybrid search: {} merged results", merged.len());
        Ok(merged)
    }

    fn len(&self) -> usize {
        self.lexical.len().max(self.semantic.len())
    }

    fn method(&self) -> RetrievalMethod {
        RetrievalMethod::Hybrid
    }
}
