//! Tokens, token blocks, and the block diff
//!
//! A [`TokenBlock`] is the lexical snapshot of one document version. Blocks
//! are replaced wholesale on every edit; unchanged prefix tokens are shared
//! by reference with the previous block.

use std::ops::Range;
use std::sync::Arc;

use super::grammar::{BreakPolicy, Grammar, PLAIN_TYPE};
use super::lexer::Lexer;
use crate::error::ScanError;
use crate::util::char_len;

/// Type name of the zero-width end-of-file sentinel
pub const EOF_TYPE: &str = "__eof__";

/// A classified run of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub type_name: Arc<str>,
    pub class_name: Arc<str>,
    /// Never contains a `\n` except as the final char
    pub text: String,
    /// Char offset of the first char
    pub start: usize,
    /// True when the char before `start` is a `\n`
    pub starts_new_line: bool,
}

impl Token {
    /// Char offset just past the last char
    pub fn end(&self) -> usize {
        self.start + self.len()
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Same type and text; position is ignored
    pub fn same_content(&self, other: &Token) -> bool {
        self.type_name == other.type_name && self.text == other.text
    }

    /// The zero-width sentinel standing for the caret slot after the last char
    pub fn end_of_file(total_len: usize, starts_new_line: bool) -> Self {
        Self {
            type_name: Arc::from(EOF_TYPE),
            class_name: Arc::from(EOF_TYPE),
            text: String::new(),
            start: total_len,
            starts_new_line,
        }
    }

    pub fn is_end_of_file(&self) -> bool {
        &*self.type_name == EOF_TYPE
    }

    /// Copy of this token moved by `delta` chars
    fn shifted(&self, delta: isize) -> Self {
        Self {
            start: (self.start as isize + delta) as usize,
            ..self.clone()
        }
    }
}

/// A single text edit, in chars, against the text before the edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    pub offset: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl TextEdit {
    pub fn insert(offset: usize, inserted: usize) -> Self {
        Self {
            offset,
            removed: 0,
            inserted,
        }
    }

    pub fn remove(offset: usize, removed: usize) -> Self {
        Self {
            offset,
            removed,
            inserted: 0,
        }
    }

    /// End of the replaced range in the old text
    pub fn old_end(&self) -> usize {
        self.offset + self.removed
    }

    /// Net length change
    pub fn delta(&self) -> isize {
        self.inserted as isize - self.removed as isize
    }
}

/// Index ranges in which two blocks differ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRange {
    /// Range in the old block to remove
    pub old: Range<usize>,
    /// Range in the new block that replaces it
    pub new: Range<usize>,
}

/// Ordered token sequence for one document version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBlock {
    tokens: Vec<Arc<Token>>,
}

impl TokenBlock {
    pub fn new(tokens: Vec<Arc<Token>>) -> Self {
        Self { tokens }
    }

    /// Lex the whole text from offset 0 with no predecessor
    pub fn from_scan(grammar: &Grammar, text: &str) -> Result<Self, ScanError> {
        let tokens = Lexer::new(grammar, text, 0, None)?
            .map(|token| token.map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    /// Unhighlighted rendition of `text`: one `plain` token per physical line
    pub fn unhighlighted(text: &str) -> Self {
        let plain: Arc<str> = Arc::from(PLAIN_TYPE);
        let mut start = 0;
        let tokens = text
            .split_inclusive('\n')
            .enumerate()
            .map(|(i, line)| {
                let token = Token {
                    type_name: plain.clone(),
                    class_name: plain.clone(),
                    text: line.to_string(),
                    start,
                    starts_new_line: i > 0,
                };
                start += char_len(line);
                Arc::new(token)
            })
            .collect();
        Self { tokens }
    }

    /// Re-lex `text` (already edited) from the start of the line holding
    /// `edit_offset - 1`.
    ///
    /// Tokens before that line are reused; everything after is re-lexed to
    /// the end of the text.
    pub fn rescan_from(
        old: &TokenBlock,
        grammar: &Grammar,
        text: &str,
        edit_offset: usize,
    ) -> Result<Self, ScanError> {
        Self::rescan(old, grammar, text, edit_offset, None)
    }

    /// Like [`rescan_from`](Self::rescan_from), but stops lexing once the new
    /// tokens line up with the old tokens after the edit and reuses the rest.
    pub fn rescan_edit(
        old: &TokenBlock,
        grammar: &Grammar,
        text: &str,
        edit: &TextEdit,
    ) -> Result<Self, ScanError> {
        Self::rescan(old, grammar, text, edit.offset, Some(edit))
    }

    fn rescan(
        old: &TokenBlock,
        grammar: &Grammar,
        text: &str,
        edit_offset: usize,
        edit: Option<&TextEdit>,
    ) -> Result<Self, ScanError> {
        let mut restart = edit_offset
            .checked_sub(1)
            .map(|offset| old.index_containing(offset))
            .unwrap_or(0);
        // Back up to the start of the line, and on to the first piece of a
        // multi-line token the line opens with. Patterns read ahead up to the
        // end of the line, so any earlier token on it may lex differently.
        while restart > 0
            && (!old.tokens[restart - 1].text.ends_with('\n')
                || old.continues_chunk(grammar, restart - 1, &old.tokens[restart]))
        {
            restart -= 1;
        }
        let (scan_start, predecessor) = match old.tokens.get(restart) {
            Some(token) => (
                token.start,
                restart
                    .checked_sub(1)
                    .map(|i| old.tokens[i].type_name.clone()),
            ),
            None => (old.total_len(), old.tokens.last().map(|t| t.type_name.clone())),
        };

        let mut tokens: Vec<Arc<Token>> = old.tokens[..restart].to_vec();
        let mut relexed = 0usize;

        let mut lexer = Lexer::new(grammar, text, scan_start, predecessor.as_deref())?;
        loop {
            if let Some(edit) = edit {
                if let Some(index) = old.resync_index(grammar, &lexer, edit) {
                    let delta = edit.delta();
                    tracing::trace!(
                        "Re-lex resynced after {} tokens at old index {}",
                        relexed,
                        index
                    );
                    tokens.extend(old.tokens[index..].iter().map(|t| {
                        if delta == 0 {
                            Arc::clone(t)
                        } else {
                            Arc::new(t.shifted(delta))
                        }
                    }));
                    return Ok(Self { tokens });
                }
            }
            match lexer.next() {
                Some(token) => {
                    tokens.push(Arc::new(token?));
                    relexed += 1;
                }
                None => break,
            }
        }

        tracing::trace!("Re-lexed {} tokens from offset {}", relexed, scan_start);
        Ok(Self { tokens })
    }

    /// Index of the old token from which the old block can be reused, if the
    /// lexer is now in the same state the old scan was in at that token.
    ///
    /// The lexer must sit past the inserted text, between logical tokens,
    /// with the same predecessor and line-start flag as the old token had.
    fn resync_index(
        &self,
        grammar: &Grammar,
        lexer: &Lexer<'_>,
        edit: &TextEdit,
    ) -> Option<usize> {
        let offset = lexer.offset();
        if !lexer.is_between_tokens() || offset < edit.offset + edit.inserted {
            return None;
        }
        let old_offset = usize::try_from(offset as isize - edit.delta()).ok()?;
        if old_offset < edit.old_end() {
            return None;
        }
        let index = self.first_at_or_after(old_offset);
        let token = self.tokens.get(index)?;
        if token.start != old_offset || token.starts_new_line != lexer.at_line_start() {
            return None;
        }
        if index > 0 && self.continues_chunk(grammar, index - 1, token) {
            return None;
        }
        let old_predecessor = index.checked_sub(1).map(|i| &*self.tokens[i].type_name);
        (old_predecessor == lexer.predecessor()).then_some(index)
    }

    pub fn tokens(&self) -> &[Arc<Token>] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Token>> {
        self.tokens.get(index)
    }

    /// Token at `index`, or the EOF sentinel when `index == len()`
    pub fn token_or_eof(&self, index: usize) -> Option<Arc<Token>> {
        match self.tokens.get(index) {
            Some(token) => Some(token.clone()),
            None if index == self.tokens.len() => {
                let after_newline = self.tokens.last().is_some_and(|t| t.text.ends_with('\n'));
                Some(Arc::new(Token::end_of_file(self.total_len(), after_newline)))
            }
            None => None,
        }
    }

    /// Total length in chars of the text this block covers
    pub fn total_len(&self) -> usize {
        self.tokens.last().map(|t| t.end()).unwrap_or(0)
    }

    /// Concatenated token text
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Sub-sequence `start..end` as a new block (clamped to the block)
    pub fn slice(&self, start: usize, end: usize) -> TokenBlock {
        let end = end.min(self.tokens.len());
        let start = start.min(end);
        Self {
            tokens: self.tokens[start..end].to_vec(),
        }
    }

    /// Index of the last token starting at or before `offset` (0 if none)
    pub fn index_containing(&self, offset: usize) -> usize {
        self.tokens
            .partition_point(|t| t.start <= offset)
            .saturating_sub(1)
    }

    /// Whether `token` may be a later piece of the multi-line token that
    /// the token at `previous` belongs to.
    ///
    /// Only chunk-matched types span lines; a scanned token always ends at
    /// the first newline.
    fn continues_chunk(&self, grammar: &Grammar, previous: usize, token: &Token) -> bool {
        let previous = &self.tokens[previous];
        previous.text.ends_with('\n')
            && previous.type_name == token.type_name
            && grammar
                .style(&token.type_name)
                .is_some_and(|style| matches!(style.policy, BreakPolicy::ChunkMatch { .. }))
    }

    /// Index of the first token starting at or after `offset`
    fn first_at_or_after(&self, offset: usize) -> usize {
        self.tokens.partition_point(|t| t.start < offset)
    }

    /// Smallest prefix/suffix-stable range in which `self` (old) and `other`
    /// (new) differ by content, or `None` if they are equal.
    pub fn changed_range(&self, other: &TokenBlock) -> Option<DiffRange> {
        let a = &self.tokens;
        let b = &other.tokens;
        let shared = a.len().min(b.len());

        let mut start = 0;
        while start < shared && a[start].same_content(&b[start]) {
            start += 1;
        }

        if start == shared {
            if a.len() == b.len() {
                return None;
            }
            return Some(DiffRange {
                old: start..a.len(),
                new: start..b.len(),
            });
        }

        // The suffix scan never crosses `start`; since a[start] != b[start]
        // at least one side keeps a non-empty range.
        let (mut end_a, mut end_b) = (a.len(), b.len());
        while end_a > start && end_b > start && a[end_a - 1].same_content(&b[end_b - 1]) {
            end_a -= 1;
            end_b -= 1;
        }
        debug_assert!(end_a > start || end_b > start);

        Some(DiffRange {
            old: start..end_a,
            new: start..end_b,
        })
    }

    /// [`changed_range`](Self::changed_range) widened so that the first token
    /// after the range also keeps its line-start flag in sync.
    pub fn render_range(&self, other: &TokenBlock) -> Option<DiffRange> {
        let mut range = self.changed_range(other)?;
        if let (Some(old_next), Some(new_next)) =
            (self.tokens.get(range.old.end), other.tokens.get(range.new.end))
        {
            if old_next.starts_new_line != new_next.starts_new_line {
                range.old.end += 1;
                range.new.end += 1;
            }
        }
        Some(range)
    }
}
