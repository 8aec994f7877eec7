//! The single primary cursor
//!
//! Positions are char offsets into the buffer, `0..=total_len`. All
//! movement is resolved against the current [`PositionIndex`].

use super::position::{EofMode, Location, PositionIndex};

/// A caret position and the token it resolves to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: Option<usize>,
    location: Option<Location>,
}

impl Cursor {
    /// A cursor with no position (no document loaded)
    pub const fn new() -> Self {
        Self {
            position: None,
            location: None,
        }
    }

    /// A cursor placed at `offset` (clamped)
    pub fn at(offset: usize, index: &PositionIndex) -> Self {
        let mut cursor = Self::new();
        cursor.move_to(offset as isize, index);
        cursor
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Token the cursor resolved to on its last move or relocation
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Move to `offset`, clamped to `[0, total_len]`.
    ///
    /// Returns false (and does nothing) when already there.
    pub fn move_to(&mut self, offset: isize, index: &PositionIndex) -> bool {
        let clamped = offset.clamp(0, index.total_len() as isize) as usize;
        if self.position == Some(clamped) {
            return false;
        }
        self.position = Some(clamped);
        self.location = Some(index.locate(clamped as isize, EofMode::AllowEof));
        true
    }

    pub fn move_left(&mut self, index: &PositionIndex) -> bool {
        match self.position {
            Some(p) => self.move_to(p as isize - 1, index),
            None => false,
        }
    }

    pub fn move_right(&mut self, index: &PositionIndex) -> bool {
        match self.position {
            Some(p) => self.move_to(p as isize + 1, index),
            None => false,
        }
    }

    pub fn move_up(&mut self, index: &PositionIndex) -> bool {
        let Some(p) = self.position else {
            return false;
        };
        let line = index.line_of(p);
        if line == 0 {
            return false;
        }
        let column = p - index.line_start(line);
        self.move_to(vertical_target(index, line - 1, column) as isize, index)
    }

    pub fn move_down(&mut self, index: &PositionIndex) -> bool {
        let Some(p) = self.position else {
            return false;
        };
        let line = index.line_of(p);
        if line + 1 >= index.line_count() {
            return false;
        }
        let column = p - index.line_start(line);
        self.move_to(vertical_target(index, line + 1, column) as isize, index)
    }

    /// Shift the position for an edit of `removed` chars replaced by
    /// `inserted` chars at `offset`.
    ///
    /// The location is stale afterwards until [`relocate`](Self::relocate).
    pub fn adjust_for_edit(&mut self, offset: usize, removed: usize, inserted: usize) {
        let Some(p) = self.position else {
            return;
        };
        let old_end = offset + removed;
        let adjusted = if p >= old_end {
            p - removed + inserted
        } else if p > offset {
            offset
        } else {
            p
        };
        self.position = Some(adjusted);
    }

    /// Re-resolve the location against a new index, clamping the position
    pub fn relocate(&mut self, index: &PositionIndex) {
        if let Some(p) = self.position {
            let p = p.min(index.total_len());
            self.position = Some(p);
            self.location = Some(index.locate(p as isize, EofMode::AllowEof));
        }
    }

    /// `(line, column)` of the cursor
    pub fn line_column(&self, index: &PositionIndex) -> Option<(usize, usize)> {
        self.position.map(|p| index.line_column(p))
    }
}

/// Offset on `line` closest to `column`, never past the line's last char
fn vertical_target(index: &PositionIndex, line: usize, column: usize) -> usize {
    let start = index.line_start(line);
    let end = index.line_end(line);
    (start + column).min(end.saturating_sub(1)).max(start)
}
