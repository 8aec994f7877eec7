//! Editor session - one open document with its derived highlighting state
//!
//! The buffer is authoritative. Every edit flows one way:
//! buffer → token block → render tree patch → position index → cursor.

use std::path::Path;
use std::sync::Arc;

use super::cursor::Cursor;
use super::document::Document;
use super::position::PositionIndex;
use crate::config::EngineConfig;
use crate::error::{InvalidRangeError, ScanError};
use crate::render::RenderTree;
use crate::syntax::{DiffRange, Grammar, GrammarRegistry, LanguageId, TextEdit, Token, TokenBlock};
use crate::tracing::SessionSnapshot;
use crate::util::char_len;

/// Result of an edit: the render diff that was applied, if anything changed
pub type EditResult = Result<Option<DiffRange>, InvalidRangeError>;

#[derive(Debug)]
pub struct EditorSession {
    registry: GrammarRegistry,
    grammar: Arc<Grammar>,
    document: Document,
    block: TokenBlock,
    index: PositionIndex,
    tree: RenderTree,
    cursor: Cursor,
    /// Set after a scan error; edits stay unhighlighted until the next
    /// `set_content` or `set_language`
    degraded: bool,
    last_error: Option<ScanError>,
}

impl EditorSession {
    /// Empty session highlighting with the plain text grammar
    pub fn new(registry: GrammarRegistry) -> Self {
        Self::with_language(registry, crate::syntax::PLAIN_GRAMMAR_ID)
    }

    /// Empty session using the grammar `grammar_id`
    pub fn with_language(mut registry: GrammarRegistry, grammar_id: &str) -> Self {
        let grammar = registry.load(grammar_id);
        let mut session = Self {
            registry,
            grammar,
            document: Document::new(),
            block: TokenBlock::default(),
            index: PositionIndex::default(),
            tree: RenderTree::default(),
            cursor: Cursor::new(),
            degraded: false,
            last_error: None,
        };
        session.rehighlight();
        session.cursor.move_to(0, &session.index);
        session
    }

    /// Empty session configured from the engine config
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_language(
            GrammarRegistry::from_config(config),
            &config.default_language,
        )
    }

    /// Load a file, picking the grammar from its extension
    pub fn open_file(&mut self, path: &Path) -> Result<(), std::io::Error> {
        let document = Document::from_file(path.to_path_buf())?;
        tracing::info!(
            "Opened {} as {}",
            document.display_name(),
            document.language.display_name()
        );
        self.grammar = self.registry.load_language(document.language);
        self.document = document;
        self.reset_after_load();
        Ok(())
    }

    // ========================================================================
    // Core operations
    // ========================================================================

    /// Switch grammar and re-highlight the current content; the cursor stays
    pub fn set_language(&mut self, grammar_id: &str) {
        self.grammar = self.registry.load(grammar_id);
        self.document.language = LanguageId::from_grammar_id(grammar_id).unwrap_or_default();
        tracing::debug!("Language set to '{}'", grammar_id);
        self.rehighlight();
        self.cursor.relocate(&self.index);
    }

    /// Replace the buffer, fully re-highlight, cursor to offset 0
    pub fn set_content(&mut self, text: &str) {
        self.document.set_text(text);
        self.reset_after_load();
    }

    /// Insert `text` at `offset` (clamped to `[0, len]`)
    pub fn insert(&mut self, offset: usize, text: &str) -> EditResult {
        if text.is_empty() {
            return Ok(None);
        }
        let offset = self.document.insert(offset, text);
        self.apply_edit(TextEdit::insert(offset, char_len(text)))
    }

    /// Remove `count` chars at `offset` (clamped to the buffer)
    pub fn remove(&mut self, offset: usize, count: usize) -> EditResult {
        let (offset, removed) = self.document.remove(offset, count);
        if removed == 0 {
            return Ok(None);
        }
        self.apply_edit(TextEdit::remove(offset, removed))
    }

    /// Insert at the cursor; the cursor ends up after the inserted text
    pub fn insert_at_cursor(&mut self, text: &str) -> EditResult {
        let offset = self.cursor.position().unwrap_or(0);
        self.insert(offset, text)
    }

    /// Remove up to `count` chars before the cursor (backspace)
    pub fn remove_before_cursor(&mut self, count: usize) -> EditResult {
        let Some(position) = self.cursor.position() else {
            return Ok(None);
        };
        let start = position.saturating_sub(count);
        self.remove(start, position - start)
    }

    pub fn cursor_move_to(&mut self, offset: isize) -> bool {
        self.cursor.move_to(offset, &self.index)
    }

    pub fn cursor_move_left(&mut self) -> bool {
        self.cursor.move_left(&self.index)
    }

    pub fn cursor_move_right(&mut self) -> bool {
        self.cursor.move_right(&self.index)
    }

    pub fn cursor_move_up(&mut self) -> bool {
        self.cursor.move_up(&self.index)
    }

    pub fn cursor_move_down(&mut self) -> bool {
        self.cursor.move_down(&self.index)
    }

    /// Current buffer snapshot
    pub fn get_text(&self) -> String {
        self.document.text()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn tokens(&self) -> &TokenBlock {
        &self.block
    }

    pub fn render_tree(&self) -> &RenderTree {
        &self.tree
    }

    pub fn position_index(&self) -> &PositionIndex {
        &self.index
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_line_column(&self) -> Option<(usize, usize)> {
        self.cursor.line_column(&self.index)
    }

    /// Token under the cursor, or the EOF sentinel at the end of the text
    pub fn token_at_cursor(&self) -> Option<Arc<Token>> {
        let location = self.cursor.location()?;
        self.block.token_or_eof(location.token_index)
    }

    /// Id of the grammar in use
    pub fn language(&self) -> &str {
        self.grammar.id()
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn len_chars(&self) -> usize {
        self.document.len_chars()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The scan error that degraded highlighting, if any
    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut GrammarRegistry {
        &mut self.registry
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    fn reset_after_load(&mut self) {
        self.rehighlight();
        self.cursor = Cursor::at(0, &self.index);
    }

    /// Full re-lex and rebuild of every derived structure
    fn rehighlight(&mut self) {
        let text = self.document.text();
        self.degraded = false;
        self.last_error = None;
        self.block = match TokenBlock::from_scan(&self.grammar, &text) {
            Ok(block) => block,
            Err(e) => self.fall_back(e, &text),
        };
        self.index = PositionIndex::from_block(&self.block);
        self.tree = RenderTree::from_block(&self.block);
    }

    /// Record a scan error and return the unhighlighted block for `text`
    fn fall_back(&mut self, error: ScanError, text: &str) -> TokenBlock {
        tracing::error!(
            "Scan failed with grammar '{}', showing unhighlighted text: {}",
            self.grammar.id(),
            error
        );
        self.degraded = true;
        self.last_error = Some(error);
        TokenBlock::unhighlighted(text)
    }

    /// Bring block, tree, index and cursor up to date after a buffer edit
    fn apply_edit(&mut self, edit: TextEdit) -> EditResult {
        let before =
            tracing::enabled!(tracing::Level::TRACE).then(|| SessionSnapshot::from_session(self));
        let text = self.document.text();

        let block = if self.degraded {
            TokenBlock::unhighlighted(&text)
        } else {
            match TokenBlock::rescan_edit(&self.block, &self.grammar, &text, &edit) {
                Ok(block) => block,
                Err(e) => self.fall_back(e, &text),
            }
        };

        let range = self.block.render_range(&block);
        let patched = match &range {
            Some(range) => self.tree.patch(
                range.old.start,
                range.old.len(),
                &block.tokens()[range.new.clone()],
            ),
            None => Ok(()),
        };

        self.block = block;
        self.index = PositionIndex::from_block(&self.block);
        self.cursor.adjust_for_edit(edit.offset, edit.removed, edit.inserted);
        self.cursor.relocate(&self.index);

        if let Err(e) = patched {
            tracing::error!("Render patch failed, rebuilding tree: {}", e);
            self.tree = RenderTree::from_block(&self.block);
            return Err(e);
        }

        if let Some(before) = before {
            if let Some(diff) = before.diff(&SessionSnapshot::from_session(self)) {
                tracing::trace!("Edit at {}: {}", edit.offset, diff);
            }
        }
        Ok(range)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(GrammarRegistry::new())
    }
}
