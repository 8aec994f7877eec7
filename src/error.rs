//! Error types for the highlighting engine
//!
//! - [`GrammarConfigError`]: a grammar resource is malformed. Recovered by
//!   falling back to the plain text grammar for that language.
//! - [`ScanError`]: the lexer could not continue. Recovered by rendering the
//!   buffer unhighlighted.
//! - [`InvalidRangeError`]: a patch or position operation was handed an
//!   inconsistent range. This is an invariant violation inside the engine.

use std::fmt;

/// Errors raised while compiling a grammar resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarConfigError {
    /// The resource text could not be parsed as YAML/JSON
    Parse(String),
    /// The resource file could not be read
    Io(String),
    /// No grammar with this id exists in any search location
    NotFound(String),
    /// A rule names a token type that has no entry in the style table
    UnknownTokenType { rule: String },
    /// A style entry declares neither `break_on` nor `break_after`
    MissingBreakPolicy { token_type: String },
    /// A style entry declares both `break_on` and `break_after`
    AmbiguousBreakPolicy { token_type: String },
    /// A pattern failed to compile
    InvalidPattern {
        owner: String,
        pattern: String,
        message: String,
    },
}

impl fmt::Display for GrammarConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            GrammarConfigError::Io(e) => write!(f, "IO error: {}", e),
            GrammarConfigError::NotFound(id) => write!(f, "Grammar not found: {}", id),
            GrammarConfigError::UnknownTokenType { rule } => {
                write!(f, "Rule '{}' has no style entry", rule)
            }
            GrammarConfigError::MissingBreakPolicy { token_type } => {
                write!(f, "No break policy for token type '{}'", token_type)
            }
            GrammarConfigError::AmbiguousBreakPolicy { token_type } => write!(
                f,
                "Token type '{}' declares both break_on and break_after",
                token_type
            ),
            GrammarConfigError::InvalidPattern {
                owner,
                pattern,
                message,
            } => write!(
                f,
                "Invalid pattern /{}/ for '{}': {}",
                pattern, owner, message
            ),
        }
    }
}

impl std::error::Error for GrammarConfigError {}

/// Errors raised while scanning text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Scan was asked to start beyond the end of the text
    OffsetOutOfBounds { offset: usize, len: usize },
    /// A realized token type has no style entry
    UnknownTokenType(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::OffsetOutOfBounds { offset, len } => write!(
                f,
                "Scan offset {} is beyond the end of the text ({} chars)",
                offset, len
            ),
            ScanError::UnknownTokenType(name) => write!(f, "Unknown token type: {}", name),
        }
    }
}

impl std::error::Error for ScanError {}

/// An operation was given a range that does not fit the structure it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRangeError {
    pub start: usize,
    pub len: usize,
    pub available: usize,
}

impl fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range {}..{} exceeds the {} available nodes",
            self.start,
            self.start + self.len,
            self.available
        )
    }
}

impl std::error::Error for InvalidRangeError {}
