//! Syntax highlighting module
//!
//! Grammar-driven lexing with incremental re-lex:
//! - Language detection from file extensions and mime types
//! - Grammar resources compiled once and cached per language
//! - A lazy lexer producing line-aware tokens
//! - Token blocks with a prefix/suffix diff for patching the render tree
//!
//! ## Architecture
//!
//! ```text
//! Edit → Document (rope) → TokenBlock::rescan_edit → render_range(old, new)
//!      → RenderTree::patch → PositionIndex rebuild → cursor adjust
//! ```

mod grammar;
mod languages;
mod lexer;
mod registry;
mod token;

pub use grammar::{
    BreakPolicy, Grammar, GrammarData, Pattern, RuleData, StyleData, TokenStyle, TokenTypeRule,
    PLAIN_GRAMMAR_ID, PLAIN_TYPE,
};
pub use languages::LanguageId;
pub use lexer::{scan, Lexer};
pub use registry::{from_file, BuiltinGrammar, GrammarRegistry, BUILTIN_GRAMMARS};
pub use token::{DiffRange, TextEdit, Token, TokenBlock, EOF_TYPE};
