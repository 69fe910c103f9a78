//! Pluggable embedding backends
//!
//! - **Hashed backend**: deterministic token feature hashing, no model or network
//! - **HTTP backend**: OpenAI-compatible APIs (OpenAI, LM Studio, vLLM, etc.)
//!
//! ```toml
//! [embedding]
//! backend = "http"
//! endpoint = "http://localhost:1234/v1/embeddings"
//! model = "nomic-embed-text-v1.5"
//! dimensions = 768
//! ```

mod factory;
mod hashed;
mod http;
mod traits;

pub use factory::create_backend;
pub use hashed::HashedBackend;
pub use http::{HttpBackend, HttpConfig};
pub use traits::{EmbeddingBackend, EmbeddingError, EmbeddingResult};
