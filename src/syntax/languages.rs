//! Language identification and detection
//!
//! Maps file extensions and mime types to language IDs, and language IDs to
//! the grammar each one is highlighted with.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    JavaScript,
    C,
    Cpp,
}

impl LanguageId {
    /// All languages with a builtin grammar
    pub const ALL: [LanguageId; 4] = [
        LanguageId::PlainText,
        LanguageId::JavaScript,
        LanguageId::C,
        LanguageId::Cpp,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => LanguageId::JavaScript,
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Detect language from a mime type such as `text/x-c-source`
    pub fn from_mime_type(mime: &str) -> Self {
        match mime {
            "application/javascript" | "text/javascript" => LanguageId::JavaScript,
            "text/x-c-source" | "text/x-csrc" => LanguageId::C,
            "text/x-cplusplus-source" | "text/x-c++src" => LanguageId::Cpp,
            // text/plain, text/html, text/markdown and anything unknown
            _ => LanguageId::PlainText,
        }
    }

    /// Mime type reported for this language
    pub fn mime_type(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "text/plain",
            LanguageId::JavaScript => "application/javascript",
            LanguageId::C => "text/x-c-source",
            LanguageId::Cpp => "text/x-cplusplus-source",
        }
    }

    /// Registry key of the grammar used for this language
    pub fn grammar_id(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "text",
            LanguageId::JavaScript => "javascript",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
        }
    }

    /// Inverse of [`grammar_id`](Self::grammar_id)
    pub fn from_grammar_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.grammar_id() == id)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}
