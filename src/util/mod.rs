//! Utility modules

pub mod text;

pub use text::{char_len, char_to_byte, follows_newline};
