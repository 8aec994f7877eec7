//! Engine configuration
//!
//! Reads user preferences from `~/.config/naive/config.yaml`. Nothing is
//! written back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Grammar id used when no language is detected (e.g., "text", "javascript")
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Extra directories searched for grammar files, after the user grammar dir
    #[serde(default)]
    pub grammar_dirs: Vec<PathBuf>,
}

fn default_language() -> String {
    crate::syntax::PLAIN_GRAMMAR_ID.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            grammar_dirs: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults if it is missing
    /// or malformed
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
