//! Dense retrieval over a vector store

use super::Retriever;
use crate::embedding::EmbeddingBackend;
use crate::error::{RagError, RagResult};
use crate::index::VectorStore;
use crate::types::{Chunk, ChunkId, RetrievalMethod, ScoredChunk};
use std::sync::Arc;
use tracing::debug;

/// Embeds the query once and ranks stored chunks by cosine similarity
///
/// Store entries are keyed by the chunk's slot in the indexed sequence, so
/// chunks that share a `doc#pos` id stay distinct.
pub struct SemanticRetriever {
    backend: Arc<dyn EmbeddingBackend>,
    store: Arc<dyn VectorStore>,
    chunks: Vec<Chunk>,
}

impl SemanticRetriever {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            backend,
            store,
            chunks: Vec::new(),
        }
    }

    /// Embed every chunk and replace the store contents
    pub fn index(&mut self, chunks: &[Chunk]) -> RagResult<()> {
        self.store.clear();
        self.chunks.clear();
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.backend.embed_batch(&texts)?;
        let slots: Vec<ChunkId> = (0..chunks.len()).map(|slot| slot.to_string()).collect();

        self.store
            .add(&slots, &texts, &vectors)
            .map_err(|e| RagError::Retrieval(format!("{:#}", e)))?;
        self.chunks = chunks.to_vec();

        debug!(
            "Semantic index holds {} chunks ({} backend)",
            self.store.len(),
            self.backend.name()
        );
        Ok(())
    }
}

impl Retriever for SemanticRetriever {
    fn search(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>> {
        // The store rejects requests larger than its population.
        let n_results = k.min(self.store.len());
        if n_results == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.backend.embed(query)?;
        let matches = self
            .store
            .query(&query_vector, n_results)
            .map_err(|e| RagError::Retrieval(format!("{:#}", e)))?;

        let results: Vec<ScoredChunk> = matches
            .into_iter()
            .map(|m| -> RagResult<ScoredChunk> {
                let chunk = m
                    .id
                    .parse::<usize>()
                    .ok()
                    .and_then(|slot| self.chunks.get(slot))
                    .ok_or_else(|| {
                        RagError::Retrieval(format!("vector store returned unknown entry '{}'", m.id))
                    })?;
                Ok(ScoredChunk::new(chunk.clone(), m.similarity, RetrievalMethod::Semantic))
            })
            .collect::<RagResult<Vec<_>>>()?;

        debug!("Semantic search: {} results", results.len());
        Ok(results)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn method(&self) -> RetrievalMethod {
        RetrievalMethod::Semantic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::backend::HashedBackend;
    use crate::embedding::{EmbeddingError, EmbeddingResult};
    use crate::index::InMemoryVectorStore;
    use crate::types::Embedding;

    fn retriever() -> SemanticRetriever {
        SemanticRetriever::new(
            Arc::new(HashedBackend::new(128).unwrap()),
            Arc::new(InMemoryVectorStore::new(128)),
        )
    }

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new("notes.md", i, *t))
            .collect()
    }

    #[derive(Debug)]
    struct BrokenBackend;

    impl EmbeddingBackend for BrokenBackend {
        fn embed(&self, _text: &str) -> EmbeddingResult<Embedding> {
            Err(EmbeddingError::EmbeddingFailed("service down".to_string()))
        }

        fn dimensions(&self) -> usize {
            128
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_empty_store_returns_nothing() {
        assert!(retriever().search("query", 5).unwrap().is_empty());
    }

    #[test]
    fn test_k_is_clamped_to_population() {
        let mut r = retriever();
        r.index(&chunks(&["alpha", "beta", "gamma"])).unwrap();
        assert_eq!(r.search("alpha", 5).unwrap().len(), 3);
        assert_eq!(r.search("alpha", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_results_sorted_and_carry_chunk_identity() {
        let mut r = retriever();
        r.index(&chunks(&[
            "tomato soup recipe",
            "ownership and borrowing in rust",
            "garden tools",
        ]))
        .unwrap();
        let results = r.search("rust borrowing", 3).unwrap();
        assert_eq!(results[0].chunk.id(), "notes.md#1");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().all(|s| s.method == RetrievalMethod::Semantic));
    }

    #[test]
    fn test_chunks_sharing_an_id_stay_distinct() {
        let mut r = retriever();
        r.index(&[
            Chunk::new("report.pdf", 0, "ownership rules borrowing references"),
            Chunk::new("report.pdf", 0, "tomato soup recipe"),
        ])
        .unwrap();
        let results = r.search("ownership borrowing", 2).unwrap();
        assert_eq!(results[0].text(), "ownership rules borrowing references");
        assert_eq!(results[1].text(), "tomato soup recipe");
        assert!(results.iter().all(|s| s.chunk.document_id == "report.pdf"));
    }

    #[test]
    fn test_foreign_store_entry_is_retrieval_error() {
        let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(128));
        let backend = HashedBackend::new(128).unwrap();
        let vector = backend.embed("stray entry").unwrap();
        store
            .add(&["elsewhere#3".to_string()], &["stray entry".to_string()], &[vector])
            .unwrap();

        let r = SemanticRetriever::new(Arc::new(backend), store);
        assert!(matches!(r.search("stray", 1), Err(RagError::Retrieval(_))));
    }

    #[test]
    fn test_reindex_replaces_store() {
        let mut r = retriever();
        r.index(&chunks(&["one", "two", "three"])).unwrap();
        r.index(&chunks(&["four"])).unwrap();
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_embedding_failure_is_retrieval_error() {
        let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(128));
        let mut good = SemanticRetriever::new(Arc::new(HashedBackend::new(128).unwrap()), store.clone());
        good.index(&chunks(&["alpha"])).unwrap();

        let broken = SemanticRetriever::new(Arc::new(BrokenBackend), store);
        let err = broken.search("alpha", 1).unwrap_err();
        assert!(matches!(err, RagError::Retrieval(_)));
    }
}
