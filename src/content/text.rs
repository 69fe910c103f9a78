//! Plain text extraction

/// Plain text extractor
pub struct TextExtractor;

impl TextExtractor {
    /// Decode file bytes as UTF-8, replacing invalid sequences
    pub fn extract(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_valid_utf8() {
        assert_eq!(TextExtractor::extract("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_extract_invalid_utf8_is_lossy() {
        let text = TextExtractor::extract(&[b'a', 0xff, b'b']);
        assert_eq!(text, "a\u{fffd}b");
    }
}
