//! Tracing infrastructure for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=naive::syntax=trace` - re-lex statistics
//! - `RUST_LOG=naive::model::session=trace` - per-edit session snapshots
//!
//! # Log Files
//!
//! Logs are written to `~/.config/naive/logs/naive.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::EditorSession;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// `~/.config/naive/logs/naive.log` at debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "naive.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of session state for diffing across an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub cursor: Option<usize>,
    pub text_len: usize,
    pub token_count: usize,
    pub line_count: usize,
    pub degraded: bool,
}

impl SessionSnapshot {
    pub fn from_session(session: &EditorSession) -> Self {
        Self {
            cursor: session.cursor().position(),
            text_len: session.len_chars(),
            token_count: session.tokens().len(),
            line_count: session.render_tree().line_count(),
            degraded: session.is_degraded(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SessionSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.cursor != other.cursor {
            changes.push(format!("cursor: {:?} → {:?}", self.cursor, other.cursor));
        }
        if self.text_len != other.text_len {
            changes.push(format!("chars: {} → {}", self.text_len, other.text_len));
        }
        if self.token_count != other.token_count {
            changes.push(format!(
                "tokens: {} → {}",
                self.token_count, other.token_count
            ));
        }
        if self.line_count != other.line_count {
            changes.push(format!("lines: {} → {}", self.line_count, other.line_count));
        }
        if self.degraded != other.degraded {
            let status = if other.degraded { "degraded" } else { "restored" };
            changes.push(format!("highlighting {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(cursor: usize, tokens: usize) -> SessionSnapshot {
        SessionSnapshot {
            cursor: Some(cursor),
            text_len: 4,
            token_count: tokens,
            line_count: 1,
            degraded: false,
        }
    }

    #[test]
    fn test_snapshot_diff_reports_changes() {
        let before = snapshot(1, 3);
        let after = snapshot(2, 4);
        let diff = before.diff(&after).unwrap();
        assert!(diff.contains("cursor: Some(1) → Some(2)"));
        assert!(diff.contains("tokens: 3 → 4"));
    }

    #[test]
    fn test_snapshot_diff_none_when_equal() {
        assert_eq!(snapshot(1, 3).diff(&snapshot(1, 3)), None);
    }

    #[test]
    fn test_snapshot_diff_degraded() {
        let before = snapshot(0, 1);
        let after = SessionSnapshot {
            degraded: true,
            ..before.clone()
        };
        assert_eq!(before.diff(&after).unwrap(), "highlighting degraded");
    }
}
