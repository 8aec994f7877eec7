//! Property-based tests for lexing, diffing and incremental editing.
//!
//! Random edits are drawn from a small alphabet rich in characters that
//! change token boundaries: comment openers, newlines, operators, digits.

mod common;

use std::sync::Arc;

use common::{assert_session_consistent, grammar, test_session, types_and_texts, KEYWORDS, MINI};
use naive::render::RenderTree;
use naive::syntax::{Grammar, GrammarRegistry, TextEdit, TokenBlock};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Insert { at: usize, text: String },
    Remove { at: usize, count: usize },
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("(if|else|while|[a-z0-9 =/*+\n]){0,40}").expect("valid regex")
}

/// Source-like text for the builtin grammars: comment, string, template
/// and regex delimiters mixed with words and line breaks
fn source_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("(if|let|return|#|//|/\\*|\\*/|[a-z0-9 =/*+\"'`;\\\\\n]){0,40}")
        .expect("valid regex")
}

fn edits(text: impl Strategy<Value = String>) -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..64, text).prop_map(|(at, text)| Edit::Insert { at, text }),
        (0usize..64, 1usize..8).prop_map(|(at, count)| Edit::Remove { at, count }),
    ]
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    edits(text_strategy())
}

fn source_edit_strategy() -> impl Strategy<Value = Edit> {
    edits(source_strategy())
}

fn chars(text: &str) -> usize {
    text.chars().count()
}

/// Text after replacing `removed` chars at `offset` with `inserted`
fn splice(text: &str, offset: usize, removed: usize, inserted: &str) -> String {
    let mut out: String = text.chars().take(offset).collect();
    out.push_str(inserted);
    out.extend(text.chars().skip(offset + removed));
    out
}

fn both_grammars() -> [Grammar; 2] {
    [grammar(MINI), grammar(KEYWORDS)]
}

const BUILTIN_IDS: [&str; 3] = ["javascript", "c", "cpp"];

fn builtin_grammars() -> Vec<Arc<Grammar>> {
    let mut registry = GrammarRegistry::with_search_dirs(Vec::new());
    BUILTIN_IDS.iter().map(|id| registry.load(id)).collect()
}

/// Apply `edits` to a session on `grammar_id` one by one, checking every
/// derived structure after each
fn replay(grammar_id: &str, start: &str, edits: &[Edit]) -> Result<(), TestCaseError> {
    let mut session = test_session(grammar_id, start);
    let mut expected = start.to_string();
    for edit in edits {
        match edit {
            Edit::Insert { at, text } => {
                let offset = (*at).min(chars(&expected));
                expected = splice(&expected, offset, 0, text);
                session.insert(*at, text).unwrap();
            }
            Edit::Remove { at, count } => {
                let offset = (*at).min(chars(&expected));
                let count = (*count).min(chars(&expected) - offset);
                expected = splice(&expected, offset, count, "");
                session.remove(*at, count).unwrap();
            }
        }
        prop_assert_eq!(session.get_text(), expected.clone());
        prop_assert_eq!(session.render_tree().flatten(), expected.clone());
        assert_session_consistent(&session);
    }
    Ok(())
}

proptest! {
    #[test]
    fn lossless_partition(text in text_strategy()) {
        for g in both_grammars() {
            let block = TokenBlock::from_scan(&g, &text).unwrap();
            prop_assert_eq!(block.text(), text.clone());
            let mut expected_start = 0;
            for token in block.tokens() {
                prop_assert_eq!(token.start, expected_start);
                prop_assert!(!token.text.is_empty());
                expected_start += chars(&token.text);
            }
        }
    }

    #[test]
    fn no_embedded_breaks(text in text_strategy()) {
        for g in both_grammars() {
            let block = TokenBlock::from_scan(&g, &text).unwrap();
            let mut after_newline = false;
            for token in block.tokens() {
                prop_assert!(!token.text.trim_end_matches('\n').contains('\n'));
                prop_assert!(token.text.matches('\n').count() <= 1);
                prop_assert_eq!(token.starts_new_line, after_newline);
                after_newline = token.text.ends_with('\n');
            }
        }
    }

    #[test]
    fn diff_identity(text in text_strategy()) {
        let block = TokenBlock::from_scan(&grammar(MINI), &text).unwrap();
        prop_assert_eq!(block.changed_range(&block), None);
    }

    #[test]
    fn diff_preserves_unaffected_edges(a in text_strategy(), b in text_strategy()) {
        let g = grammar(MINI);
        let old = TokenBlock::from_scan(&g, &a).unwrap();
        let new = TokenBlock::from_scan(&g, &b).unwrap();
        match old.changed_range(&new) {
            None => prop_assert_eq!(
                types_and_texts(old.tokens()),
                types_and_texts(new.tokens())
            ),
            Some(range) => {
                prop_assert!(range.old.start == range.new.start);
                prop_assert!(!range.old.is_empty() || !range.new.is_empty());
                prop_assert_eq!(
                    types_and_texts(&old.tokens()[..range.old.start]),
                    types_and_texts(&new.tokens()[..range.new.start])
                );
                prop_assert_eq!(
                    types_and_texts(&old.tokens()[range.old.end..]),
                    types_and_texts(&new.tokens()[range.new.end..])
                );
            }
        }
    }

    #[test]
    fn incremental_relex_matches_full_scan(
        text in text_strategy(),
        at in 0usize..64,
        removed in 0usize..8,
        inserted in text_strategy(),
    ) {
        for g in both_grammars() {
            let old = TokenBlock::from_scan(&g, &text).unwrap();
            let offset = at.min(chars(&text));
            let removed = removed.min(chars(&text) - offset);
            let after = splice(&text, offset, removed, &inserted);
            let edit = TextEdit { offset, removed, inserted: chars(&inserted) };

            let full = TokenBlock::from_scan(&g, &after).unwrap();
            prop_assert_eq!(&TokenBlock::rescan_edit(&old, &g, &after, &edit).unwrap(), &full);
            prop_assert_eq!(&TokenBlock::rescan_from(&old, &g, &after, offset).unwrap(), &full);
        }
    }

    #[test]
    fn patch_flatten_equivalence(
        start in text_strategy(),
        edits in prop::collection::vec(edit_strategy(), 1..12),
    ) {
        replay("mini", &start, &edits)?;
    }

    #[test]
    fn builtin_grammars_relex_like_a_full_scan(
        text in source_strategy(),
        at in 0usize..64,
        removed in 0usize..8,
        inserted in source_strategy(),
    ) {
        for g in builtin_grammars() {
            let old = TokenBlock::from_scan(&g, &text).unwrap();
            let offset = at.min(chars(&text));
            let removed = removed.min(chars(&text) - offset);
            let after = splice(&text, offset, removed, &inserted);
            let edit = TextEdit { offset, removed, inserted: chars(&inserted) };

            let full = TokenBlock::from_scan(&g, &after).unwrap();
            prop_assert_eq!(&TokenBlock::rescan_edit(&old, &g, &after, &edit).unwrap(), &full);
            prop_assert_eq!(&TokenBlock::rescan_from(&old, &g, &after, offset).unwrap(), &full);
        }
    }

    #[test]
    fn builtin_sessions_stay_consistent(
        start in source_strategy(),
        edits in prop::collection::vec(source_edit_strategy(), 1..12),
    ) {
        for id in BUILTIN_IDS {
            replay(id, &start, &edits)?;
        }
    }

    #[test]
    fn patch_from_any_block_to_any_block(a in text_strategy(), b in text_strategy()) {
        let g = grammar(MINI);
        let old = TokenBlock::from_scan(&g, &a).unwrap();
        let new = TokenBlock::from_scan(&g, &b).unwrap();
        let mut tree = RenderTree::from_block(&old);
        if let Some(range) = old.render_range(&new) {
            tree.patch(range.old.start, range.old.len(), &new.tokens()[range.new.clone()])
                .unwrap();
        }
        prop_assert_eq!(tree.flatten(), b);
        prop_assert_eq!(tree, RenderTree::from_block(&new));
    }

    #[test]
    fn cursor_clamping(text in text_strategy(), target in -100isize..200) {
        let mut session = test_session("mini", &text);
        session.cursor_move_to(-5);
        prop_assert_eq!(session.cursor().position(), Some(0));
        session.cursor_move_to(1_000_000);
        prop_assert_eq!(session.cursor().position(), Some(chars(&text)));

        session.cursor_move_to(target);
        let position = session.cursor().position().unwrap();
        prop_assert!(position <= chars(&text));
        let location = session.cursor().location().unwrap();
        let token = session.token_at_cursor().unwrap();
        prop_assert_eq!(token.start + location.relative_offset, position);
    }

    #[test]
    fn vertical_moves_stay_in_bounds(text in text_strategy(), target in 0isize..64, downs in 0usize..6) {
        let mut session = test_session("mini", &text);
        session.cursor_move_to(target);
        for _ in 0..downs {
            session.cursor_move_down();
        }
        for _ in 0..downs {
            session.cursor_move_up();
        }
        let position = session.cursor().position().unwrap();
        prop_assert!(position <= chars(&text));
        let (line, _) = session.cursor_line_column().unwrap();
        prop_assert!(line < session.position_index().line_count());
    }
}
