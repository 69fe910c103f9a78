//! Feature-hashing embedding backend
//!
//! Projects lowercase word tokens into a fixed number of buckets with xxh3
//! and L2-normalizes the result. Texts that share vocabulary get a positive
//! cosine similarity, which is enough for offline use and tests.

use super::traits::{EmbeddingBackend, EmbeddingError, EmbeddingResult};
use crate::types::Embedding;
use xxhash_rust::xxh3::xxh3_64;

/// Deterministic, model-free embedding backend
#[derive(Debug, Clone)]
pub struct HashedBackend {
    dimensions: usize,
}

impl HashedBackend {
    pub fn new(dimensions: usize) -> EmbeddingResult<Self> {
        if dimensions == 0 {
            return Err(EmbeddingError::Config(
                "hashed backend needs at least one dimension".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }
}

impl EmbeddingBackend for HashedBackend {
    fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = xxh3_64(token.to_lowercase().as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            // High bit picks the sign so collisions partially cancel out.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        Ok(normalize(vector))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed"
    }
}

fn normalize(mut vector: Embedding) -> Embedding {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}
