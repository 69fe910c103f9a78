//! Embedding backend configuration

use serde::{Deserialize, Serialize};

/// Default timeout for HTTP backend requests
fn default_timeout() -> u64 {
    30
}

/// Default batch size for HTTP backend requests
fn default_batch_size() -> usize {
    100
}

fn default_dimensions() -> usize {
    384
}

/// Backend configuration for embedding providers
///
/// ```toml
/// # Offline, deterministic feature hashing (default)
/// [embedding]
/// backend = "hashed"
/// dimensions = 384
///
/// # Any OpenAI-compatible endpoint (OpenAI, LM Studio, vLLM, TEI, ...)
/// [embedding]
/// backend = "http"
/// endpoint = "http://localhost:1234/v1/embeddings"
/// model = "all-MiniLM-L6-v2"
/// dimensions = 384
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Token feature hashing; needs no model files or network
    Hashed {
        /// Embedding dimensions
        #[serde(default = "default_dimensions")]
        dimensions: usize,
    },

    /// OpenAI-compatible HTTP endpoint
    Http {
        /// API endpoint URL (e.g., "https://api.openai.com/v1/embeddings")
        endpoint: String,
        /// API key (optional, can also use OPENAI_API_KEY env var)
        #[serde(default)]
        api_key: Option<String>,
        /// Model name (e.g., "text-embedding-3-small")
        model: String,
        /// Embedding dimensions
        dimensions: usize,
        /// Request timeout in seconds
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
        /// Maximum batch size for requests
        #[serde(default = "default_batch_size")]
        max_batch_size: usize,
    },
}

impl BackendConfig {
    /// Embedding dimensions produced by this backend
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Hashed { dimensions } | Self::Http { dimensions, .. } => *dimensions,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Hashed {
            dimensions: default_dimensions(),
        }
    }
}
