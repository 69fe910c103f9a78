//! docrag: hybrid retrieval-augmented answering over a document folder
//!
//! - Text extraction and cleaning for PDF and plain-text files
//! - Overlapping word-window chunking
//! - BM25 Okapi lexical search and embedding search over an in-memory vector store
//! - Per-list score normalization, merge and dedup, then a second-pass reranker
//! - Query classification and Groq/OpenAI model routing with one fallback

pub mod chunking;
pub mod config;
pub mod content;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod retrieval;
pub mod routing;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{RagError, RagResult};
pub use pipeline::{Answer, AskOptions, KnowledgeBase, RagPipeline};
pub use types::*;
