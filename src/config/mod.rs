//! Configuration for docrag

mod embedding;
mod generation;
mod index;
mod logging;

pub use embedding::BackendConfig;
pub use generation::{GenerationConfig, ProviderConfig};
pub use index::{ChunkingConfig, DedupKey, RerankerKind, RetrievalConfig, ScoreNormalization};
pub use logging::{LogFormat, LogLevel, LoggingConfig};

use crate::routing::QueryCategory;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: BackendConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Chunking
        if self.chunking.max_words == 0 {
            errors.push("chunking.max_words must be positive".to_string());
        }
        if self.chunking.overlap_words >= self.chunking.max_words {
            errors.push(format!(
                "chunking.overlap_words ({}) must be less than chunking.max_words ({})",
                self.chunking.overlap_words, self.chunking.max_words
            ));
        }

        // Embedding
        let dimensions = self.embedding.dimensions();
        if dimensions == 0 {
            errors.push("embedding dimensions must be positive".to_string());
        }
        if dimensions > 4096 {
            errors.push("embedding dimensions must be <= 4096".to_string());
        }
        if let BackendConfig::Http {
            endpoint,
            max_batch_size,
            timeout_secs,
            ..
        } = &self.embedding
        {
            if endpoint.trim().is_empty() {
                errors.push("embedding endpoint must not be empty".to_string());
            }
            if *max_batch_size == 0 {
                errors.push("embedding max_batch_size must be positive".to_string());
            }
            if *timeout_secs == 0 {
                errors.push("embedding timeout_secs must be positive".to_string());
            }
        }

        // Retrieval
        if self.retrieval.candidate_count == 0 {
            errors.push("retrieval.candidate_count must be positive".to_string());
        }
        if self.retrieval.min_fetch == 0 {
            errors.push("retrieval.min_fetch must be positive".to_string());
        }
        if self.retrieval.bm25_k1 < 0.0 {
            errors.push("retrieval.bm25_k1 must not be negative".to_string());
        }
        if !(0.0..=1.0).contains(&self.retrieval.bm25_b) {
            errors.push("retrieval.bm25_b must be between 0.0 and 1.0".to_string());
        }

        // Generation
        if self.generation.timeout_secs == 0 {
            errors.push("generation.timeout_secs must be positive".to_string());
        }
        for category in self.generation.routes.keys() {
            if category.parse::<QueryCategory>().is_err() {
                errors.push(format!("generation.routes: unknown query category '{}'", category));
            }
        }
        for (name, provider) in [("groq", &self.generation.groq), ("openai", &self.generation.openai)] {
            if provider.endpoint.trim().is_empty() {
                errors.push(format!("generation.{}.endpoint must not be empty", name));
            }
            if provider.model.trim().is_empty() {
                errors.push(format!("generation.{}.model must not be empty", name));
            }
            if !(0.0..=2.0).contains(&provider.temperature) {
                errors.push(format!("generation.{}.temperature must be between 0.0 and 2.0", name));
            }
            if provider.max_tokens == 0 {
                errors.push(format!("generation.{}.max_tokens must be positive", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(valid_config().validate().is_ok(), "default config should be valid");
    }

    #[test]
    fn validate_rejects_overlap_not_smaller_than_chunk() {
        let mut cfg = valid_config();
        cfg.chunking.max_words = 100;
        cfg.chunking.overlap_words = 100;
        let err = cfg.validate().unwrap_err();
        assert!(
            err.to_string().contains("must be less than chunking.max_words"),
            "unexpected error message: {}",
            err
        );
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let mut cfg = valid_config();
        cfg.chunking.max_words = 0;
        cfg.chunking.overlap_words = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("chunking.max_words must be positive"));
    }

    #[test]
    fn validate_rejects_zero_embedding_dimensions() {
        let mut cfg = valid_config();
        cfg.embedding = BackendConfig::Hashed { dimensions: 0 };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("embedding dimensions must be positive"));
    }

    #[test]
    fn validate_rejects_unknown_route_category() {
        let mut cfg = valid_config();
        cfg.generation
            .routes
            .insert("poetry".to_string(), crate::routing::ProviderKind::OpenAi);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unknown query category 'poetry'"));
    }

    #[test]
    fn validate_reports_all_errors_together() {
        let mut cfg = valid_config();
        cfg.retrieval.candidate_count = 0;
        cfg.generation.timeout_secs = 0;
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("candidate_count must be positive"));
        assert!(msg.contains("generation.timeout_secs must be positive"));
    }

    #[test]
    fn from_toml_accepts_empty_document() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn from_toml_parses_sections() {
        let cfg = Config::from_toml(
            r#"
            [chunking]
            max_words = 200
            overlap_words = 40

            [embedding]
            backend = "hashed"
            dimensions = 128

            [retrieval]
            normalization = "raw"

            [logging]
            format = "json"
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.chunking.max_words, 200);
        assert_eq!(cfg.embedding.dimensions(), 128);
        assert_eq!(cfg.retrieval.normalization, ScoreNormalization::Raw);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, LogLevel::Debug);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/docrag.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
