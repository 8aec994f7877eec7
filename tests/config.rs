//! Configuration system tests
//!
//! Tests for config paths, engine config loading, and grammar lookup through
//! user grammar directories.

use std::fs;

use naive::config::EngineConfig;
use naive::config_paths;
use naive::model::EditorSession;
use naive::syntax::{GrammarRegistry, PLAIN_TYPE};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("naive"));
}

#[test]
fn test_grammars_dir_is_inside_config_dir() {
    let config = config_paths::config_dir().unwrap();
    let grammars = config_paths::grammars_dir().unwrap();
    assert!(grammars.starts_with(&config));
    assert!(grammars.ends_with("grammars"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert_eq!(path.extension().unwrap(), "yaml");
}

// ========================================================================
// Engine Config Tests
// ========================================================================

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::load_from(&dir.path().join("config.yaml"));
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.default_language, "text");
}

#[test]
fn test_config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "default_language: javascript\ngrammar_dirs:\n  - /opt/grammars\n",
    )
    .unwrap();
    let config = EngineConfig::load_from(&path);
    assert_eq!(config.default_language, "javascript");
    assert_eq!(config.grammar_dirs.len(), 1);
}

#[test]
fn test_malformed_config_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "default_language: [unclosed").unwrap();
    assert_eq!(EngineConfig::load_from(&path), EngineConfig::default());
}

// ========================================================================
// Grammar Directory Tests
// ========================================================================

const SHOUT: &str = r#"
id: shout
name: Shout
rules:
  - name: loud
    pattern: "[A-Z]"
styles:
  loud:
    class: keyword
    break_on: "[^A-Z]"
"#;

#[test]
fn test_grammar_from_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("shout.yaml"), SHOUT).unwrap();
    let config = EngineConfig {
        default_language: "shout".to_string(),
        grammar_dirs: vec![dir.path().to_path_buf()],
    };

    let mut session = EditorSession::from_config(&config);
    assert_eq!(session.language(), "shout");
    session.set_content("HEY you");
    let types: Vec<&str> = session
        .tokens()
        .tokens()
        .iter()
        .map(|t| &*t.type_name)
        .collect();
    assert_eq!(types[0], "loud");
    assert!(types[1..].iter().all(|t| *t == PLAIN_TYPE));
}

#[test]
fn test_user_grammar_overrides_builtin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("javascript.yaml"),
        SHOUT.replace("id: shout", "id: javascript"),
    )
    .unwrap();
    let mut registry = GrammarRegistry::with_search_dirs(vec![dir.path().to_path_buf()]);
    let grammar = registry.load("javascript");
    assert_eq!(grammar.rules().len(), 1);
}

#[test]
fn test_json_grammar_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("digits.json"),
        r#"{
            "id": "digits",
            "rules": [{ "name": "number", "pattern": "[0-9]" }],
            "styles": { "number": { "class": "number", "break_on": "[^0-9]" } }
        }"#,
    )
    .unwrap();
    let mut registry = GrammarRegistry::with_search_dirs(vec![dir.path().to_path_buf()]);
    let grammar = registry.load("digits");
    assert_eq!(grammar.id(), "digits");
    assert!(registry.available_ids().contains(&"digits".to_string()));
}

#[test]
fn test_broken_grammar_falls_back_to_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("broken.yaml"),
        "id: broken\nrules:\n  - name: ghost\n    pattern: \"x\"\nstyles: {}\n",
    )
    .unwrap();
    let mut registry = GrammarRegistry::with_search_dirs(vec![dir.path().to_path_buf()]);
    let grammar = registry.load("broken");
    assert_eq!(grammar.id(), "broken");
    assert_eq!(grammar.rules().len(), 1);
    assert_eq!(&*grammar.rules()[0].name, PLAIN_TYPE);
    // Cached: the fallback is returned again without re-reading the file
    fs::write(dir.path().join("broken.yaml"), SHOUT.replace("shout", "broken")).unwrap();
    assert_eq!(&*registry.load("broken").rules()[0].name, PLAIN_TYPE);
}

#[test]
fn test_logs_dir_is_inside_config_dir() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert_eq!(logs, config.join("logs"));
}
