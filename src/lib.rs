//! naive - incremental grammar-driven syntax highlighting
//!
//! This crate provides the core of a live code editor's highlighting path:
//! grammars, a lazy lexer, token blocks with a prefix/suffix diff, a
//! line-structured render tree patched in place, and a cursor resolved
//! against the current tokens.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod model;
pub mod render;
pub mod syntax;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{GrammarConfigError, InvalidRangeError, ScanError};
pub use model::{Cursor, EditorSession};
pub use render::RenderTree;
pub use syntax::{Grammar, GrammarRegistry, LanguageId, Token, TokenBlock};
