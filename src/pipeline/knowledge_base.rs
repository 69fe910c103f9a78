//! Indexed corpus: cleaned chunks plus the lexical and semantic indexes

use crate::chunking::TextSplitter;
use crate::config::{ChunkingConfig, RetrievalConfig};
use crate::content::clean_text;
use crate::embedding::EmbeddingBackend;
use crate::error::RagResult;
use crate::index::InMemoryVectorStore;
use crate::retrieval::{Bm25Params, Bm25Retriever, HybridRetriever, Retriever, SemanticRetriever};
use crate::types::{Chunk, Document, ScoredChunk};
use std::sync::Arc;
use tracing::{info, warn};

/// Chunks and indexes built once from a document set
///
/// Construction is two-phase: [`KnowledgeBase::empty`] yields a searchable
/// empty state and [`KnowledgeBase::index`] (re)builds everything from
/// documents. Rebuilding takes `&mut self`, so it cannot overlap a search.
pub struct KnowledgeBase {
    splitter: TextSplitter,
    backend: Arc<dyn EmbeddingBackend>,
    retrieval: RetrievalConfig,
    chunks: Vec<Chunk>,
    hybrid: HybridRetriever,
}

impl KnowledgeBase {
    pub fn empty(
        chunking: ChunkingConfig,
        backend: Arc<dyn EmbeddingBackend>,
        retrieval: RetrievalConfig,
    ) -> RagResult<Self> {
        let splitter = TextSplitter::new(chunking)?;
        let hybrid = Self::build_hybrid(&[], &backend, &retrieval)?;
        Ok(Self {
            splitter,
            backend,
            retrieval,
            chunks: Vec::new(),
            hybrid,
        })
    }

    /// Clean, chunk and index `documents`
    pub fn build(
        documents: &[Document],
        chunking: ChunkingConfig,
        backend: Arc<dyn EmbeddingBackend>,
        retrieval: RetrievalConfig,
    ) -> RagResult<Self> {
        let mut kb = Self::empty(chunking, backend, retrieval)?;
        kb.index(documents)?;
        Ok(kb)
    }

    /// Replace the corpus with `documents`
    ///
    /// Only configuration errors are returned. If embedding the chunks fails
    /// the semantic index stays empty and search runs on BM25 alone.
    pub fn index(&mut self, documents: &[Document]) -> RagResult<()> {
        let mut chunks = Vec::new();
        for document in documents {
            let cleaned = Document::new(document.id.clone(), clean_text(&document.content));
            chunks.extend(self.splitter.split_document(&cleaned)?);
        }

        self.hybrid = Self::build_hybrid(&chunks, &self.backend, &self.retrieval)?;
        self.chunks = chunks;

        info!(
            "Indexed {} documents into {} chunks",
            documents.len(),
            self.chunks.len()
        );
        Ok(())
    }

    fn build_hybrid(
        chunks: &[Chunk],
        backend: &Arc<dyn EmbeddingBackend>,
        retrieval: &RetrievalConfig,
    ) -> RagResult<HybridRetriever> {
        let mut lexical = Bm25Retriever::new(Bm25Params::from(retrieval));
        lexical.index(chunks);

        let new_semantic = || {
            SemanticRetriever::new(
                backend.clone(),
                Arc::new(InMemoryVectorStore::new(backend.dimensions())),
            )
        };
        let mut semantic = new_semantic();
        if let Err(e) = semantic.index(chunks) {
            if e.is_configuration() {
                return Err(e);
            }
            warn!("Semantic indexing failed, continuing with lexical search only: {}", e);
            semantic = new_semantic();
        }

        Ok(HybridRetriever::new(
            Arc::new(lexical),
            Arc::new(semantic),
            retrieval.clone(),
        ))
    }

    /// Hybrid search over the corpus
    pub fn search(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>> {
        self.hybrid.search(query, k)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn backend(&self) -> &Arc<dyn EmbeddingBackend> {
        &self.backend
    }

    pub fn retrieval_config(&self) -> &RetrievalConfig {
        &self.retrieval
    }
}
