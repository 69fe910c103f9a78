//! Text embeddings
//!
//! A shared [`EmbeddingBackend`] feeds the semantic retriever, the embedding
//! reranker and the answer validator.

pub mod backend;
mod similarity;

pub use backend::{create_backend, EmbeddingBackend, EmbeddingError, EmbeddingResult};
pub use similarity::cosine_similarity;
