//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use naive::model::EditorSession;
use naive::render::RenderTree;
use naive::syntax::{Grammar, GrammarData, GrammarRegistry, Token, TokenBlock};

/// `keyword` chunks for `if|else`, per-character `plain` everywhere else
pub const KEYWORDS: &str = r#"
id: keywords
rules:
  - name: keyword
    pattern: "if|else"
styles:
  keyword:
    class: kw
    break_after: "if|else"
"#;

/// Small C-like grammar exercising both break policies, predecessor
/// constraints and multi-line chunks
pub const MINI: &str = r#"
id: mini
rules:
  - name: keyword
    pattern: "if|else|while"
  - name: line_comment
    pattern: "//"
  - name: block_comment
    pattern: "/\\*"
  - name: number
    pattern: "[0-9]"
  - name: word
    pattern: "[a-z_]"
  - name: regex
    pattern: "/"
    from: [operator]
  - name: operator
    pattern: "[-+*/=<>]"
styles:
  keyword:
    class: keyword
    break_after: "if|else|while"
  line_comment:
    class: comment
    break_on: "\n"
  block_comment:
    class: comment
    break_after: "(?s:/\\*.*?(?:\\*/|\\z))"
  number:
    class: number
    break_on: "[^0-9]"
  word:
    class: identifier
    break_on: "[^a-z_0-9]"
  regex:
    class: regex
    break_after: "/[^/\n]*/?"
  operator:
    class: operator
    break_after: "[-+*/=<>]"
"#;

pub fn grammar(yaml: &str) -> Grammar {
    Grammar::compile(GrammarData::from_yaml(yaml).unwrap()).unwrap()
}

/// Registry without user search dirs, with the test grammars registered
pub fn test_registry() -> GrammarRegistry {
    let mut registry = GrammarRegistry::with_search_dirs(Vec::new());
    registry
        .register(GrammarData::from_yaml(KEYWORDS).unwrap())
        .unwrap();
    registry
        .register(GrammarData::from_yaml(MINI).unwrap())
        .unwrap();
    registry
}

/// Session on `grammar_id` holding `text`, cursor at 0
pub fn test_session(grammar_id: &str, text: &str) -> EditorSession {
    let mut session = EditorSession::with_language(test_registry(), grammar_id);
    session.set_content(text);
    session
}

/// `(type, text)` pairs of a token slice
pub fn types_and_texts(tokens: &[Arc<Token>]) -> Vec<(String, String)> {
    tokens
        .iter()
        .map(|t| (t.type_name.to_string(), t.text.clone()))
        .collect()
}

/// Panic unless every derived structure of the session matches its buffer
pub fn assert_session_consistent(session: &EditorSession) {
    let text = session.get_text();
    assert_eq!(session.tokens().text(), text, "token block diverged");
    assert_eq!(session.render_tree().flatten(), text, "render tree diverged");
    assert_eq!(
        session.render_tree(),
        &RenderTree::from_block(session.tokens()),
        "patched tree differs from a fresh build"
    );
    assert_eq!(session.render_tree().node_count(), session.tokens().len());
    for (node, token) in session.render_tree().nodes().zip(session.tokens().tokens()) {
        assert!(node.renders(token), "node {:?} does not render {:?}", node, token);
    }
    assert_eq!(session.position_index().total_len(), text.chars().count());
    if !session.is_degraded() {
        let fresh = TokenBlock::from_scan(session.grammar(), &text).unwrap();
        assert_eq!(session.tokens(), &fresh, "incremental re-lex differs from full scan");
    }
}

/// Text of every render line
pub fn line_texts(session: &EditorSession) -> Vec<String> {
    session
        .render_tree()
        .lines()
        .iter()
        .map(|l| l.text())
        .collect()
}
