//! Document model - the authoritative text buffer

use ropey::Rope;
use std::path::PathBuf;

use crate::syntax::LanguageId;

/// Document state - the text buffer and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for in-memory documents)
    pub file_path: Option<PathBuf>,
    /// Language detected from the path
    pub language: LanguageId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            language: LanguageId::PlainText,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(&path)?;
        let language = LanguageId::from_path(&path);
        Ok(Self {
            buffer: Rope::from(content),
            file_path: Some(path),
            language,
        })
    }

    /// Get the display name for this document
    pub fn display_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Total length in chars
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len_chars() == 0
    }

    /// The whole buffer as a String
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Replace the whole buffer
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
    }

    /// Insert `text` at char offset `offset` (clamped to the buffer)
    ///
    /// Returns the offset actually used.
    pub fn insert(&mut self, offset: usize, text: &str) -> usize {
        let offset = offset.min(self.buffer.len_chars());
        self.buffer.insert(offset, text);
        offset
    }

    /// Remove up to `count` chars starting at `offset` (clamped to the buffer)
    ///
    /// Returns the `(offset, count)` actually removed.
    pub fn remove(&mut self, offset: usize, count: usize) -> (usize, usize) {
        let len = self.buffer.len_chars();
        let start = offset.min(len);
        let end = start.saturating_add(count).min(len);
        if end > start {
            self.buffer.remove(start..end);
        }
        (start, end - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Document creation tests
    // ========================================================================

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.file_path.is_none());
        assert_eq!(doc.language, LanguageId::PlainText);
        assert_eq!(doc.display_name(), "Untitled");
    }

    #[test]
    fn test_with_text_creates_buffer() {
        let doc = Document::with_text("hello\nworld");
        assert_eq!(doc.text(), "hello\nworld");
        assert_eq!(doc.len_chars(), 11);
    }

    #[test]
    fn test_from_file_detects_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "int x;\n").unwrap();
        let doc = Document::from_file(path).unwrap();
        assert_eq!(doc.language, LanguageId::C);
        assert_eq!(doc.display_name(), "main.c");
        assert_eq!(doc.len_chars(), 7);
    }

    // ========================================================================
    // Editing tests
    // ========================================================================

    #[test]
    fn test_insert_clamps_offset() {
        let mut doc = Document::with_text("ab");
        assert_eq!(doc.insert(10, "c"), 2);
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_remove_clamps_range() {
        let mut doc = Document::with_text("abcdef");
        assert_eq!(doc.remove(4, 10), (4, 2));
        assert_eq!(doc.text(), "abcd");
        assert_eq!(doc.remove(9, 1), (4, 0));
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let mut doc = Document::with_text("héllo");
        doc.remove(1, 1);
        assert_eq!(doc.text(), "hllo");
        doc.insert(1, "é");
        assert_eq!(doc.text(), "héllo");
    }
}
