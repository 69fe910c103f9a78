//! Brute-force in-memory vector store
//!
//! Entries live in insertion order behind a `parking_lot::RwLock`; queries
//! scan every vector and rank by cosine similarity.

use crate::embedding::cosine_similarity;
use crate::types::{ChunkId, Embedding};
use anyhow::{bail, Result};
use parking_lot::RwLock;
use std::cmp::Ordering;
use tracing::debug;

/// A stored vector together with the chunk it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: ChunkId,
    pub text: String,
    pub similarity: f32,
}

/// Storage seam for the semantic retriever
pub trait VectorStore: Send + Sync {
    /// Append entries; the three slices must have equal length
    fn add(&self, ids: &[ChunkId], texts: &[String], vectors: &[Embedding]) -> Result<()>;

    /// The `n_results` nearest entries, most similar first
    ///
    /// Fails when `n_results` exceeds the number of stored entries.
    fn query(&self, vector: &[f32], n_results: usize) -> Result<Vec<VectorMatch>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry
    fn clear(&self);
}

#[derive(Debug)]
struct Entry {
    id: ChunkId,
    text: String,
    vector: Embedding,
}

/// [`VectorStore`] that keeps everything in memory
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimensions: usize,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryVectorStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl VectorStore for InMemoryVectorStore {
    fn add(&self, ids: &[ChunkId], texts: &[String], vectors: &[Embedding]) -> Result<()> {
        if ids.len() != texts.len() || ids.len() != vectors.len() {
            bail!(
                "Mismatched batch: {} ids, {} texts, {} vectors",
                ids.len(),
                texts.len(),
                vectors.len()
            );
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            bail!(
                "Vector has {} dimensions, store expects {}",
                bad.len(),
                self.dimensions
            );
        }

        let mut entries = self.entries.write();
        entries.extend(
            ids.iter()
                .zip(texts)
                .zip(vectors)
                .map(|((id, text), vector)| Entry {
                    id: id.clone(),
                    text: text.clone(),
                    vector: vector.clone(),
                }),
        );
        debug!("Vector store now holds {} entries", entries.len());
        Ok(())
    }

    fn query(&self, vector: &[f32], n_results: usize) -> Result<Vec<VectorMatch>> {
        let entries = self.entries.read();
        if n_results > entries.len() {
            bail!(
                "Number of requested results {} is greater than number of elements in index {}",
                n_results,
                entries.len()
            );
        }

        let mut matches = entries
            .iter()
            .map(|entry| -> Result<VectorMatch> {
                Ok(VectorMatch {
                    id: entry.id.clone(),
                    text: entry.text.clone(),
                    similarity: cosine_similarity(vector, &entry.vector)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        matches.truncate(n_results);
        Ok(matches)
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}
