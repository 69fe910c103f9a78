//! Document loading and text cleaning
//!
//! Turns a folder of PDF / plain-text files into [`Document`]s and provides
//! the text normalization applied before chunking.

mod clean;
mod pdf;
mod text;

pub use clean::clean_text;
pub use pdf::PdfExtractor;
pub use text::TextExtractor;

use crate::types::Document;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Supported content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Plain text (.txt, .md, etc.)
    Text,
    /// PDF document
    Pdf,
    /// Unknown/unsupported
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension (case-insensitive)
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => ContentType::Pdf,
            Some("txt" | "md" | "markdown" | "text") => ContentType::Text,
            _ => ContentType::Unknown,
        }
    }
}

/// Supplies an ordered sequence of documents to index
pub trait DocumentSource {
    fn documents(&self) -> Result<Vec<Document>>;
}

impl DocumentSource for Vec<Document> {
    fn documents(&self) -> Result<Vec<Document>> {
        Ok(self.clone())
    }
}

/// Loads every supported file below a directory
///
/// Files are visited in path order so indexing is reproducible. A file that
/// cannot be extracted is skipped with a warning.
#[derive(Debug, Clone)]
pub struct FolderSource {
    root: PathBuf,
}

impl FolderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| ContentType::from_extension(p) != ContentType::Unknown)
            .collect();
        files.sort();
        files
    }

    /// Document identifier: path relative to the root
    fn document_id(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

impl DocumentSource for FolderSource {
    fn documents(&self) -> Result<Vec<Document>> {
        if !self.root.is_dir() {
            anyhow::bail!("Document folder not found: {}", self.root.display());
        }

        let files = self.list_files();
        let mut documents = Vec::with_capacity(files.len());
        for path in &files {
            match extract_from_path(path) {
                Ok(content) => {
                    debug!("Loaded {} ({} bytes)", path.display(), content.len());
                    documents.push(Document::new(self.document_id(path), content));
                }
                Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
            }
        }

        info!(
            "Loaded {} of {} files from {}",
            documents.len(),
            files.len(),
            self.root.display()
        );
        Ok(documents)
    }
}

/// Extract raw text from a local file
pub fn extract_from_path(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    match ContentType::from_extension(path) {
        ContentType::Pdf => PdfExtractor::extract(&bytes),
        ContentType::Text | ContentType::Unknown => Ok(TextExtractor::extract(&bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(ContentType::from_extension(Path::new("a.pdf")), ContentType::Pdf);
        assert_eq!(ContentType::from_extension(Path::new("a.PDF")), ContentType::Pdf);
        assert_eq!(ContentType::from_extension(Path::new("a.txt")), ContentType::Text);
        assert_eq!(ContentType::from_extension(Path::new("a.md")), ContentType::Text);
        assert_eq!(ContentType::from_extension(Path::new("a.docx")), ContentType::Unknown);
        assert_eq!(ContentType::from_extension(Path::new("noext")), ContentType::Unknown);
    }

    #[test]
    fn test_folder_source_loads_sorted_supported_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.txt"), "bravo text").unwrap();
        std::fs::write(tmp.path().join("a.md"), "alpha text").unwrap();
        std::fs::write(tmp.path().join("ignored.bin"), [0u8, 1, 2]).unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub").join("c.txt"), "charlie text").unwrap();

        let docs = FolderSource::new(tmp.path()).documents().unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        let expected_sub = Path::new("sub").join("c.txt");
        assert_eq!(ids, vec!["a.md", "b.txt", expected_sub.to_str().unwrap()]);
        assert_eq!(docs[0].content, "alpha text");
    }

    #[test]
    fn test_folder_source_skips_unreadable_pdf() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("broken.pdf"), "not really a pdf").unwrap();
        std::fs::write(tmp.path().join("ok.txt"), "fine").unwrap();

        let docs = FolderSource::new(tmp.path()).documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "ok.txt");
    }

    #[test]
    fn test_folder_source_missing_folder_is_error() {
        let result = FolderSource::new("/definitely/not/here").documents();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_folder_yields_no_documents() {
        let tmp = TempDir::new().unwrap();
        let docs = FolderSource::new(tmp.path()).documents().unwrap();
        assert!(docs.is_empty());
    }
}
