//! Grammar registry
//!
//! Grammars are compiled once per id and cached for the life of the
//! registry.
//!
//! Lookup priority for `load(id)`:
//! 1. User grammars: `~/.config/naive/grammars/{id}.yaml` (or `.yml`, `.json`)
//! 2. Directories listed in `grammar_dirs` of the engine config
//! 3. Embedded: builtin grammars compiled into the binary
//!
//! A grammar that fails to load is replaced by the plain text grammar for
//! the rest of the registry's life.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::grammar::{Grammar, GrammarData};
use super::languages::LanguageId;
use crate::config::EngineConfig;
use crate::error::GrammarConfigError;

// Embed grammar files at compile time
pub const TEXT_YAML: &str = include_str!("../../grammars/text.yaml");
pub const JAVASCRIPT_YAML: &str = include_str!("../../grammars/javascript.yaml");
pub const C_YAML: &str = include_str!("../../grammars/c.yaml");
pub const CPP_YAML: &str = include_str!("../../grammars/cpp.yaml");

/// A built-in grammar entry
pub struct BuiltinGrammar {
    /// Registry key (e.g. "javascript")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in grammars
pub const BUILTIN_GRAMMARS: &[BuiltinGrammar] = &[
    BuiltinGrammar {
        id: "text",
        yaml: TEXT_YAML,
    },
    BuiltinGrammar {
        id: "javascript",
        yaml: JAVASCRIPT_YAML,
    },
    BuiltinGrammar {
        id: "c",
        yaml: C_YAML,
    },
    BuiltinGrammar {
        id: "cpp",
        yaml: CPP_YAML,
    },
];

const GRAMMAR_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Load raw grammar data from a YAML or JSON file
pub fn from_file(path: &Path) -> Result<GrammarData, GrammarConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        GrammarConfigError::Io(format!(
            "Failed to read grammar file {}: {}",
            path.display(),
            e
        ))
    })?;
    if path.extension().is_some_and(|ext| ext == "json") {
        GrammarData::from_json(&content)
    } else {
        GrammarData::from_yaml(&content)
    }
}

/// Compiled grammars keyed by id
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    grammars: HashMap<String, Arc<Grammar>>,
    search_dirs: Vec<PathBuf>,
}

impl GrammarRegistry {
    /// Registry searching the user grammar directory, then builtins
    pub fn new() -> Self {
        Self::with_search_dirs(crate::config_paths::grammars_dir().into_iter().collect())
    }

    /// Registry searching the user grammar directory, the config's
    /// `grammar_dirs`, then builtins
    pub fn from_config(config: &EngineConfig) -> Self {
        let dirs = crate::config_paths::grammars_dir()
            .into_iter()
            .chain(config.grammar_dirs.iter().cloned())
            .collect();
        Self::with_search_dirs(dirs)
    }

    /// Registry searching exactly `search_dirs` (in order), then builtins
    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            grammars: HashMap::new(),
            search_dirs,
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Cached grammar for `id`, if it has been loaded or registered
    pub fn get(&self, id: &str) -> Option<Arc<Grammar>> {
        self.grammars.get(id).cloned()
    }

    /// Grammar for `id`, loading and caching it on first use.
    ///
    /// Never fails: a grammar that cannot be loaded is replaced by the plain
    /// text grammar and the error is logged.
    pub fn load(&mut self, id: &str) -> Arc<Grammar> {
        if let Some(grammar) = self.grammars.get(id) {
            return grammar.clone();
        }

        let grammar = match self.resolve(id).and_then(Grammar::compile) {
            Ok(grammar) => grammar,
            Err(e) => {
                tracing::warn!(
                    "Grammar '{}' failed to load, using plain text instead: {}",
                    id,
                    e
                );
                Grammar::plain_text_with_id(id)
            }
        };
        let grammar = Arc::new(grammar);
        self.grammars.insert(id.to_string(), grammar.clone());
        grammar
    }

    /// Grammar for a detected language
    pub fn load_language(&mut self, language: LanguageId) -> Arc<Grammar> {
        self.load(language.grammar_id())
    }

    /// Compile `data` and cache it under its id, replacing any earlier entry
    pub fn register(&mut self, data: GrammarData) -> Result<Arc<Grammar>, GrammarConfigError> {
        let grammar = Arc::new(Grammar::compile(data)?);
        tracing::debug!("Registered grammar '{}'", grammar.id());
        self.grammars
            .insert(grammar.id().to_string(), grammar.clone());
        Ok(grammar)
    }

    /// Find raw grammar data for `id` in the search dirs, then the builtins
    fn resolve(&self, id: &str) -> Result<GrammarData, GrammarConfigError> {
        for dir in &self.search_dirs {
            for ext in GRAMMAR_EXTENSIONS {
                let path = dir.join(format!("{}.{}", id, ext));
                if path.exists() {
                    tracing::info!("Loading grammar from {}", path.display());
                    return from_file(&path);
                }
            }
        }

        let builtin = BUILTIN_GRAMMARS
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| GrammarConfigError::NotFound(id.to_string()))?;
        tracing::debug!("Loading builtin grammar: {}", id);
        GrammarData::from_yaml(builtin.yaml)
    }

    /// Ids of every grammar that could be loaded: files in the search dirs
    /// plus the builtins, sorted
    pub fn available_ids(&self) -> Vec<String> {
        let mut ids: BTreeSet<String> = BUILTIN_GRAMMARS.iter().map(|b| b.id.to_string()).collect();
        for dir in &self.search_dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                let known_ext = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| GRAMMAR_EXTENSIONS.contains(&ext));
                if let (true, Some(stem)) = (known_ext, path.file_stem().and_then(|s| s.to_str())) {
                    ids.insert(stem.to_string());
                }
            }
        }
        ids.into_iter().collect()
    }
}
