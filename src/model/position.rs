//! Offset → token lookup
//!
//! [`PositionIndex`] is derived from a [`TokenBlock`] and rebuilt whenever
//! the block is replaced. Lookups are binary searches over token and line
//! start offsets.

use crate::syntax::TokenBlock;

/// Whether an offset at or past the end may resolve to the EOF sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofMode {
    /// Offsets at or past the end resolve to the EOF sentinel (index `len`)
    #[default]
    AllowEof,
    /// Offsets at or past the end resolve to the last real token
    NoEof,
}

/// Result of [`PositionIndex::locate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index into the block, or the block length for the EOF sentinel
    pub token_index: usize,
    /// Char offset within that token
    pub relative_offset: usize,
    pub at_eof: bool,
}

/// Token and line start offsets of one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionIndex {
    token_starts: Vec<usize>,
    line_starts: Vec<usize>,
    total_len: usize,
}

impl PositionIndex {
    pub fn from_block(block: &TokenBlock) -> Self {
        let tokens = block.tokens();
        let total_len = block.total_len();

        let mut line_starts = vec![0];
        line_starts.extend(
            tokens
                .iter()
                .filter(|t| t.starts_new_line)
                .map(|t| t.start),
        );
        // The caret after a trailing newline sits on its own empty line
        if tokens.last().is_some_and(|t| t.text.ends_with('\n')) {
            line_starts.push(total_len);
        }

        Self {
            token_starts: tokens.iter().map(|t| t.start).collect(),
            line_starts,
            total_len,
        }
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    pub fn token_count(&self) -> usize {
        self.token_starts.len()
    }

    /// Token containing `offset`.
    ///
    /// Negative offsets resolve to token 0. An empty block always resolves
    /// to the EOF sentinel at index 0.
    pub fn locate(&self, offset: isize, mode: EofMode) -> Location {
        let count = self.token_starts.len();
        if count == 0 {
            return Location {
                token_index: 0,
                relative_offset: 0,
                at_eof: true,
            };
        }
        if offset < 0 {
            return Location {
                token_index: 0,
                relative_offset: 0,
                at_eof: false,
            };
        }

        let offset = offset as usize;
        if offset >= self.total_len {
            return match mode {
                EofMode::AllowEof => Location {
                    token_index: count,
                    relative_offset: 0,
                    at_eof: true,
                },
                EofMode::NoEof => Location {
                    token_index: count - 1,
                    relative_offset: self.total_len - self.token_starts[count - 1],
                    at_eof: false,
                },
            };
        }

        let index = self
            .token_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Location {
            token_index: index,
            relative_offset: offset - self.token_starts[index],
            at_eof: false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line containing `offset` (clamped to the text)
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.total_len);
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Start offset of `line` (clamped to the last line)
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.line_starts.len() - 1);
        self.line_starts[line]
    }

    /// Start of the line after `line`, or the total length for the last line
    pub fn line_end(&self, line: usize) -> usize {
        self.line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.total_len)
    }

    /// `(line, column)` of `offset`
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.total_len);
        let line = self.line_of(offset);
        (line, offset - self.line_start(line))
    }
}
