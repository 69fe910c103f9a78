//! PDF text extraction
//!
//! Extracts text content from PDF documents using pdf-extract.

use anyhow::{Context, Result};

/// PDF content extractor
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract text content from PDF bytes, one page after another
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .context("Failed to extract text from PDF")?;

        let tidied = Self::tidy_lines(&text);
        if tidied.is_empty() {
            anyhow::bail!("PDF contains no extractable text (may be image-only)");
        }
        Ok(tidied)
    }

    /// Trim each line and squeeze runs of blank lines down to one
    fn tidy_lines(text: &str) -> String {
        text.lines()
            .map(|l| l.trim())
            .fold(Vec::new(), |mut acc: Vec<&str>, line| {
                if !line.is_empty() || acc.last().is_some_and(|l| !l.is_empty()) {
                    acc.push(line);
                }
                acc
            })
            .join("\n")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy_lines() {
        let dirty = "  Line 1  \n\n\n  Line 2  \n  \n  Line 3  ";
        assert_eq!(PdfExtractor::tidy_lines(dirty), "Line 1\n\nLine 2\n\nLine 3");
    }

    #[test]
    fn test_tidy_lines_drops_leading_blank_lines() {
        assert_eq!(PdfExtractor::tidy_lines("\n\n  \nBody"), "Body");
    }

    #[test]
    fn test_invalid_pdf_is_error() {
        assert!(PdfExtractor::extract(b"plain bytes, no header").is_err());
    }
}
