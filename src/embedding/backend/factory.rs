//! Backend factory for creating embedding backends from configuration

use super::hashed::HashedBackend;
use super::http::{HttpBackend, HttpConfig};
use super::traits::{EmbeddingBackend, EmbeddingResult};
use crate::config::BackendConfig;
use std::sync::Arc;
use tracing::info;

/// Create an embedding backend from configuration
///
/// Returns an `Arc<dyn EmbeddingBackend>` that can be shared across threads.
pub fn create_backend(config: &BackendConfig) -> EmbeddingResult<Arc<dyn EmbeddingBackend>> {
    match config {
        BackendConfig::Hashed { dimensions } => {
            info!("Creating hashed embedding backend: {} dimensions", dimensions);
            Ok(Arc::new(HashedBackend::new(*dimensions)?))
        }

        BackendConfig::Http {
            endpoint,
            api_key,
            model,
            dimensions,
            timeout_secs,
            max_batch_size,
        } => {
            info!("Creating HTTP embedding backend: endpoint={}", endpoint);

            let http_config = HttpConfig {
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
                model: model.clone(),
                dimensions: *dimensions,
                timeout_secs: *timeout_secs,
                max_batch_size: *max_batch_size,
            };

            Ok(Arc::new(HttpBackend::new(http_config)?))
        }
    }
}
