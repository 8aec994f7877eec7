//! Character/byte offset helpers
//!
//! Public offsets in this crate count chars (like `ropey`), while the regex
//! engine works on byte offsets into a `&str`.

/// Number of chars in `text`
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the char at `char_idx`, or `text.len()` past the end
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Whether the byte just before `byte_idx` is a line feed
#[inline]
pub fn follows_newline(text: &str, byte_idx: usize) -> bool {
    byte_idx > 0 && text.as_bytes()[byte_idx - 1] == b'\n'
}
