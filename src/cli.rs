//! Command-line argument parsing for the `naive` binary
//!
//! Supports:
//! - Highlighting a file and dumping its tokens
//! - Dumping render lines instead of tokens
//! - Forcing a grammar
//! - Reporting the token under a cursor offset

use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::model::EditorSession;

/// Grammar-driven syntax highlighter
#[derive(Parser, Debug)]
#[command(name = "naive", version, about = "Grammar-driven syntax highlighter")]
pub struct CliArgs {
    /// File to highlight
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Grammar id to use instead of detecting it from the extension
    #[arg(short = 'l', long, value_name = "ID")]
    pub language: Option<String>,

    /// Print render lines instead of one token per row
    #[arg(long)]
    pub lines: bool,

    /// Report the token under char offset N
    #[arg(long, value_name = "N")]
    pub cursor: Option<usize>,
}

/// What to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Tokens,
    Lines,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub language: Option<String>,
    pub output: OutputMode,
    pub cursor: Option<usize>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.file.is_dir() {
            return Err(format!("{} is a directory", self.file.display()));
        }
        if let Some(id) = &self.language {
            if id.trim().is_empty() {
                return Err("Grammar id must not be empty".to_string());
            }
        }
        Ok(RunConfig {
            file: self.file,
            language: self.language,
            output: if self.lines {
                OutputMode::Lines
            } else {
                OutputMode::Tokens
            },
            cursor: self.cursor,
        })
    }
}

/// Text report of the session's highlighting
pub fn render_report(session: &EditorSession, output: OutputMode) -> String {
    let mut out = String::new();
    match output {
        OutputMode::Tokens => {
            for token in session.tokens().tokens() {
                let _ = writeln!(
                    out,
                    "{:>6}  {:<14} {:<12} {:?}",
                    token.start,
                    &*token.type_name,
                    &*token.class_name,
                    token.text
                );
            }
        }
        OutputMode::Lines => {
            for (i, line) in session.render_tree().lines().iter().enumerate() {
                let _ = write!(out, "{:>4} |", i + 1);
                for node in &line.nodes {
                    let _ = write!(out, " [{}:{:?}]", node.class_name(), node.text());
                }
                out.push('\n');
            }
        }
    }
    out
}

/// One-line description of the cursor and the token under it
pub fn cursor_report(session: &EditorSession) -> Option<String> {
    let position = session.cursor().position()?;
    let (line, column) = session.cursor_line_column()?;
    let location = session.cursor().location()?;
    let token = session.token_at_cursor()?;
    Some(format!(
        "cursor {} (line {}, column {}) in token {} '{}' at +{}",
        position,
        line + 1,
        column + 1,
        location.token_index,
        token.type_name,
        location.relative_offset
    ))
}
