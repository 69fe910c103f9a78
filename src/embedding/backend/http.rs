//! OpenAI-compatible embedding endpoint
//!
//! Works against OpenAI itself and local servers exposing `/v1/embeddings`
//! (LM Studio, vLLM, text-embeddings-inference).

use super::traits::{EmbeddingBackend, EmbeddingError, EmbeddingResult};
use crate::types::Embedding;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings for [`HttpBackend`]
#[derive(Clone)]
pub struct HttpConfig {
    pub endpoint: String,
    /// Falls back to `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,
    pub model: String,
    pub dimensions: usize,
    pub timeout_secs: u64,
    pub max_batch_size: usize,
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_batch_size", &self.max_batch_size)
            .finish()
    }
}

/// HTTP embedding backend
#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    config: HttpConfig,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl HttpBackend {
    pub fn new(config: HttpConfig) -> EmbeddingResult<Self> {
        if config.max_batch_size == 0 {
            return Err(EmbeddingError::Config(
                "max_batch_size must be positive".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty());

        match &api_key {
            Some(key) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|e| EmbeddingError::Config(format!("Invalid API key format: {}", e)))?;
                headers.insert(AUTHORIZATION, value);
            }
            None if config.endpoint.contains("openai.com") => {
                warn!("No API key provided for {}", config.endpoint);
            }
            None => {}
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| EmbeddingError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "HTTP embedding backend ready: endpoint={}, model={}, {} dimensions",
            config.endpoint, config.model, config.dimensions
        );

        Ok(Self { client, config })
    }

    fn request_embeddings(&self, texts: &[&str]) -> EmbeddingResult<Vec<Embedding>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            // Only the text-embedding-3 family accepts a dimensions override.
            dimensions: self
                .config
                .model
                .contains("text-embedding-3")
                .then_some(self.config.dimensions),
            encoding_format: "float",
        };

        debug!(
            "Requesting {} embeddings from {}",
            texts.len(),
            self.config.endpoint
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|s| s * 1000);
            return Err(EmbeddingError::RateLimited { retry_after_ms });
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(EmbeddingError::EmbeddingFailed(format!(
                "API error ({}): {}",
                status, message
            )));
        }

        let mut data = response.json::<EmbeddingResponse>()?.data;
        if data.len() != texts.len() {
            return Err(EmbeddingError::EmbeddingFailed(format!(
                "requested {} embeddings, received {}",
                texts.len(),
                data.len()
            )));
        }
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .map(|d| {
                if d.embedding.len() != self.config.dimensions {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.config.dimensions,
                        actual: d.embedding.len(),
                    });
                }
                Ok(normalize_embedding(d.embedding))
            })
            .collect()
    }
}

impl EmbeddingBackend for HttpBackend {
    fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        self.request_embeddings(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::EmbeddingFailed("No embedding returned".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Embedding>> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut embeddings = Vec::with_capacity(refs.len());
        for batch in refs.chunks(self.config.max_batch_size) {
            embeddings.extend(self.request_embeddings(batch)?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn normalize_embedding(mut embedding: Embedding) -> Embedding {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        embedding.iter_mut().for_each(|x| *x /= norm);
    }
    embedding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HttpConfig {
        HttpConfig {
            endpoint: "http://127.0.0.1:9/v1/embeddings".to_string(),
            api_key: Some("sk-test".to_string()),
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            timeout_secs: 1,
            max_batch_size: 8,
        }
    }

    #[test]
    fn test_normalize_embedding() {
        let normalized = normalize_embedding(vec![3.0, 4.0]);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut cfg = config();
        cfg.max_batch_size = 0;
        assert!(matches!(HttpBackend::new(cfg), Err(EmbeddingError::Config(_))));
    }

    #[test]
    fn test_empty_batch_makes_no_request() {
        let backend = HttpBackend::new(config()).unwrap();
        assert!(backend.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_endpoint_is_error() {
        let backend = HttpBackend::new(config()).unwrap();
        assert!(backend.embed("hello").is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }
}
