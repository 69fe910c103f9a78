//! Fixed-size overlapping word windows

use crate::config::ChunkingConfig;
use crate::error::{RagError, RagResult};
use crate::types::{Chunk, Document};
use tracing::debug;

/// Split `text` into windows of at most `max_length` whitespace-delimited words.
///
/// Consecutive windows share exactly `overlap` words. Windows stop as soon as
/// one reaches the end of the text, so only the final window can be shorter.
/// Fails with [`RagError::Configuration`] when `overlap >= max_length`, since
/// the window would never advance.
pub fn chunk_words(text: &str, max_length: usize, overlap: usize) -> RagResult<Vec<String>> {
    if max_length == 0 {
        return Err(RagError::Configuration(
            "chunk max_length must be positive".to_string(),
        ));
    }
    if overlap >= max_length {
        return Err(RagError::Configuration(format!(
            "chunk overlap ({}) must be less than max_length ({})",
            overlap, max_length
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let step = max_length - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + max_length).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

/// Splits documents into positioned [`Chunk`]s
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: ChunkingConfig,
}

impl TextSplitter {
    /// Create a splitter, rejecting parameters that cannot make progress
    pub fn new(config: ChunkingConfig) -> RagResult<Self> {
        // Surface bad parameters at construction rather than on the first document.
        chunk_words("", config.max_words, config.overlap_words)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split a document's (already cleaned) content into chunks
    pub fn split_document(&self, document: &Document) -> RagResult<Vec<Chunk>> {
        let windows = chunk_words(
            &document.content,
            self.config.max_words,
            self.config.overlap_words,
        )?;

        let chunks: Vec<Chunk> = windows
            .into_iter()
            .enumerate()
            .map(|(position, content)| Chunk::new(document.id.clone(), position, content))
            .collect();

        debug!("Split document {} into {} chunks", document.id, chunks.len());
        Ok(chunks)
    }
}
