//! Core types for the docrag system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a document (its filename)
pub type DocumentId = String;

/// Unique identifier for a chunk (`"{document_id}#{position}"`)
pub type ChunkId = String;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// A source document as loaded from storage
///
/// Documents are ephemeral: they are cleaned and chunked at indexing time and
/// not retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Filename the text was loaded from, used only for provenance
    pub id: DocumentId,
    /// Raw text content
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// A contiguous, overlapping window of a document's normalized text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    /// Source document
    pub document_id: DocumentId,
    /// Index of this chunk within its source document
    pub position: usize,
    /// Chunk text
    pub content: String,
}

impl Chunk {
    pub fn new(document_id: impl Into<DocumentId>, position: usize, content: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            position,
            content: content.into(),
        }
    }

    /// Stable identifier derived from `(document_id, position)`
    pub fn id(&self) -> ChunkId {
        format!("{}#{}", self.document_id, self.position)
    }

    /// Number of whitespace-delimited words
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Which stage produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMethod {
    Lexical,
    Semantic,
    /// Normalized and merged from both retrievers
    Hybrid,
    Rerank,
}

impl RetrievalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Semantic => "semantic",
            Self::Hybrid => "hybrid",
            Self::Rerank => "rerank",
        }
    }
}

impl fmt::Display for RetrievalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chunk paired with a retriever-specific relevance score
///
/// Higher is always better, but scores from different methods live on
/// different scales and must be normalized before they are compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
    /// The stage that assigned `score`
    pub method: RetrievalMethod,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, score: f32, method: RetrievalMethod) -> Self {
        Self { chunk, score, method }
    }

    /// Chunk text
    pub fn text(&self) -> &str {
        &self.chunk.content
    }
}
