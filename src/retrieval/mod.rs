//! Hybrid retrieval
//!
//! Combines:
//! - BM25 Okapi lexical search
//! - Dense embedding search over a vector store
//! - Per-list score normalization, merge and text dedup
//! - A second-pass reranker over the merged candidates

mod bm25;
mod dense;
mod fusion;
mod hybrid;
mod reranker;

pub use bm25::*;
pub use dense::*;
pub use fusion::*;
pub use hybrid::*;
pub use reranker::*;

use crate::error::RagResult;
use crate::types::{RetrievalMethod, ScoredChunk};

/// A searchable index over chunks
///
/// `search` returns at most `min(k, len())` results, best first. An empty
/// index yields an empty result rather than an error.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>>;

    /// Number of indexed chunks
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tag carried by the results of this retriever
    fn method(&self) -> RetrievalMethod;
}
