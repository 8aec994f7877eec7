//! Grammar-driven lexer
//!
//! [`Lexer`] is a pull iterator: it scans one logical token per step and
//! hands out the resulting [`Token`]s lazily, so an incremental re-lex can
//! stop as soon as it has seen enough. Chunk tokens spanning several lines
//! are queued and handed out one line piece at a time.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

use super::grammar::{BreakPolicy, Grammar, TokenStyle};
use super::token::Token;
use crate::error::ScanError;
use crate::util::{char_len, char_to_byte, follows_newline};

/// Lazy token producer over `text`, starting at a char offset
#[derive(Debug)]
pub struct Lexer<'a> {
    grammar: &'a Grammar,
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
    predecessor: Option<Arc<str>>,
    pending: VecDeque<Token>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Start scanning `text` at char offset `start`.
    ///
    /// `predecessor` is the type name of the token just before `start`, used
    /// for rules with a predecessor constraint.
    pub fn new(
        grammar: &'a Grammar,
        text: &'a str,
        start: usize,
        predecessor: Option<&str>,
    ) -> Result<Self, ScanError> {
        let len = char_len(text);
        if start > len {
            return Err(ScanError::OffsetOutOfBounds { offset: start, len });
        }
        Ok(Self {
            grammar,
            text,
            byte_pos: char_to_byte(text, start),
            char_pos: start,
            predecessor: predecessor.map(Arc::from),
            pending: VecDeque::new(),
            failed: false,
        })
    }

    /// Char offset of the next unscanned character
    pub fn offset(&self) -> usize {
        self.char_pos
    }

    /// Type name of the last realized token (or the initial predecessor)
    pub fn predecessor(&self) -> Option<&str> {
        self.predecessor.as_deref()
    }

    /// True when no pieces of a multi-line token are still queued
    pub fn is_between_tokens(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a token starting at the current offset begins a line
    pub fn at_line_start(&self) -> bool {
        follows_newline(self.text, self.byte_pos)
    }

    /// Realized type and style for a token starting at the current offset
    fn classify(&self) -> Result<(Arc<str>, &'a TokenStyle), ScanError> {
        let grammar = self.grammar;
        let predecessor = self.predecessor.as_deref();
        for rule in grammar.rules() {
            if !rule.accepts_predecessor(predecessor) {
                continue;
            }
            if matches!(rule.pattern.match_len(self.text, self.byte_pos), Some(n) if n > 0) {
                let style = grammar
                    .style(&rule.name)
                    .ok_or_else(|| ScanError::UnknownTokenType(rule.name.to_string()))?;
                return Ok((rule.name.clone(), style));
            }
        }
        Ok((grammar.plain_name().clone(), grammar.plain_style()))
    }

    /// Byte length of the token starting at the current offset
    fn extent(&self, policy: &BreakPolicy) -> usize {
        let rest = &self.text[self.byte_pos..];
        match policy {
            BreakPolicy::ContinuousScan { boundary } => {
                let mut chars = rest.char_indices();
                let Some((_, first)) = chars.next() else {
                    return 0;
                };
                if first == '\n' {
                    return 1;
                }
                for (i, ch) in chars {
                    if boundary.match_len(self.text, self.byte_pos + i).is_some() {
                        return i;
                    }
                    if ch == '\n' {
                        return i + 1;
                    }
                }
                rest.len()
            }
            BreakPolicy::ChunkMatch { span } => match span.match_len(self.text, self.byte_pos) {
                Some(n) if n > 0 => n,
                _ => rest.chars().next().map(char::len_utf8).unwrap_or(0),
            },
        }
    }

    /// Scan one logical token, queueing one piece per physical line
    fn scan_token(&mut self) -> Result<(), ScanError> {
        let (type_name, style) = self.classify()?;
        let len = self.extent(&style.policy);
        let chunk = &self.text[self.byte_pos..self.byte_pos + len];

        for piece in chunk.split_inclusive('\n') {
            self.pending.push_back(Token {
                type_name: type_name.clone(),
                class_name: style.class_name.clone(),
                text: piece.to_string(),
                start: self.char_pos,
                starts_new_line: follows_newline(self.text, self.byte_pos),
            });
            self.byte_pos += piece.len();
            self.char_pos += char_len(piece);
        }

        self.predecessor = Some(type_name);
        Ok(())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(token));
        }
        if self.failed || self.byte_pos >= self.text.len() {
            return None;
        }
        if let Err(e) = self.scan_token() {
            self.failed = true;
            return Some(Err(e));
        }
        self.pending.pop_front().map(Ok)
    }
}

impl FusedIterator for Lexer<'_> {}

/// Shorthand for [`Lexer::new`]
pub fn scan<'a>(
    grammar: &'a Grammar,
    text: &'a str,
    start: usize,
    predecessor: Option<&str>,
) -> Result<Lexer<'a>, ScanError> {
    Lexer::new(grammar, text, start, predecessor)
}
