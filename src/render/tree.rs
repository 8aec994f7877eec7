//! Line-structured mirror of a token block
//!
//! The tree is a cache for the presentation layer: it holds one node per
//! token, grouped into lines by each token's `starts_new_line` flag. It is
//! kept in sync with the authoritative [`TokenBlock`] by [`RenderTree::patch`]
//! and is never consulted for text content.
//!
//! Nodes carry no char offset. Nodes outside a patched range stay valid
//! after any edit; offsets are answered by the token block and the
//! position index.

use std::sync::Arc;

use crate::error::InvalidRangeError;
use crate::syntax::{Token, TokenBlock};

/// A rendered token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    pub type_name: Arc<str>,
    pub class_name: Arc<str>,
    pub text: String,
    pub starts_new_line: bool,
}

impl RenderNode {
    pub fn from_token(token: &Token) -> Self {
        Self {
            type_name: token.type_name.clone(),
            class_name: token.class_name.clone(),
            text: token.text.clone(),
            starts_new_line: token.starts_new_line,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether this node renders `token`
    pub fn renders(&self, token: &Token) -> bool {
        self.type_name == token.type_name
            && self.class_name == token.class_name
            && self.text == token.text
            && self.starts_new_line == token.starts_new_line
    }
}

/// One physical line of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderLine {
    pub nodes: Vec<RenderNode>,
}

impl RenderLine {
    pub fn text(&self) -> String {
        self.nodes.iter().map(RenderNode::text).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Position of a node: line index and index within the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodePosition {
    pub line: usize,
    pub node: usize,
}

impl NodePosition {
    pub fn new(line: usize, node: usize) -> Self {
        Self { line, node }
    }
}

/// Lines of token nodes; always holds at least one (possibly empty) line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    lines: Vec<RenderLine>,
}

impl Default for RenderTree {
    fn default() -> Self {
        Self {
            lines: vec![RenderLine::default()],
        }
    }
}

impl RenderTree {
    /// Build the tree for a whole block
    pub fn from_block(block: &TokenBlock) -> Self {
        let lines = group_lines(block.tokens())
            .into_iter()
            .map(|nodes| RenderLine { nodes })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[RenderLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn node_count(&self) -> usize {
        self.lines.iter().map(RenderLine::len).sum()
    }

    /// Text of line `index`, if it exists
    pub fn line_text(&self, index: usize) -> Option<String> {
        self.lines.get(index).map(RenderLine::text)
    }

    /// All node texts concatenated in document order
    pub fn flatten(&self) -> String {
        self.lines.iter().flat_map(|l| &l.nodes).map(RenderNode::text).collect()
    }

    /// Every node in document order
    pub fn nodes(&self) -> impl Iterator<Item = &RenderNode> + '_ {
        self.lines.iter().flat_map(|l| &l.nodes)
    }

    /// Position of the node with flat index `index`
    pub fn position_of(&self, index: usize) -> Option<NodePosition> {
        let mut remaining = index;
        for (line, l) in self.lines.iter().enumerate() {
            if remaining < l.len() {
                return Some(NodePosition::new(line, remaining));
            }
            remaining -= l.len();
        }
        None
    }

    /// Replace `remove_count` nodes of one line, starting at `at`, with `nodes`
    pub fn splice(
        &mut self,
        at: NodePosition,
        remove_count: usize,
        nodes: Vec<RenderNode>,
    ) -> Result<(), InvalidRangeError> {
        let line = self.lines.get_mut(at.line).ok_or(InvalidRangeError {
            start: at.node,
            len: remove_count,
            available: 0,
        })?;
        if at.node + remove_count > line.len() {
            return Err(InvalidRangeError {
                start: at.node,
                len: remove_count,
                available: line.len(),
            });
        }
        line.nodes.splice(at.node..at.node + remove_count, nodes);
        Ok(())
    }

    /// Replace nodes `old_start..old_start + old_len` (flat indices) with
    /// nodes for `replacement`, re-deriving line breaks from the tokens'
    /// `starts_new_line` flags.
    ///
    /// The replacement joins the tree right after the node preceding
    /// `old_start`. On error the tree is left untouched.
    pub fn patch(
        &mut self,
        old_start: usize,
        old_len: usize,
        replacement: &[Arc<Token>],
    ) -> Result<(), InvalidRangeError> {
        let available = self.node_count();
        if old_start + old_len > available {
            return Err(InvalidRangeError {
                start: old_start,
                len: old_len,
                available,
            });
        }

        let join = match old_start.checked_sub(1) {
            None => NodePosition::new(0, 0),
            Some(before) => self
                .position_of(before)
                .map(|p| NodePosition::new(p.line, p.node + 1))
                .ok_or(InvalidRangeError {
                    start: old_start,
                    len: old_len,
                    available,
                })?,
        };
        let end = match (old_start + old_len).checked_sub(1) {
            Some(last) if old_len > 0 => self
                .position_of(last)
                .map(|p| NodePosition::new(p.line, p.node + 1))
                .ok_or(InvalidRangeError {
                    start: old_start,
                    len: old_len,
                    available,
                })?,
            _ => join,
        };

        let prefix = self.lines[join.line].nodes[..join.node].to_vec();
        let suffix = self.lines[end.line].nodes[end.node..].to_vec();

        let mut groups = group_lines_open(replacement);
        let last = groups.len() - 1;
        groups[0].splice(0..0, prefix);
        groups[last].extend(suffix);

        tracing::trace!(
            "Patch nodes {}..{} with {} tokens over lines {}..={}",
            old_start,
            old_start + old_len,
            replacement.len(),
            join.line,
            end.line
        );
        self.lines.splice(
            join.line..=end.line,
            groups.into_iter().map(|nodes| RenderLine { nodes }),
        );
        Ok(())
    }
}

/// Group tokens into lines; a leading token never opens a second line
fn group_lines(tokens: &[Arc<Token>]) -> Vec<Vec<RenderNode>> {
    let mut lines = vec![Vec::new()];
    for token in tokens {
        if token.starts_new_line && !lines[lines.len() - 1].is_empty() {
            lines.push(Vec::new());
        }
        if let Some(line) = lines.last_mut() {
            line.push(RenderNode::from_token(token));
        }
    }
    lines
}

/// Group tokens into lines that continue an existing line: a leading token
/// with `starts_new_line` leaves the first group empty
fn group_lines_open(tokens: &[Arc<Token>]) -> Vec<Vec<RenderNode>> {
    let mut lines = vec![Vec::new()];
    for token in tokens {
        if token.starts_new_line {
            lines.push(Vec::new());
        }
        if let Some(line) = lines.last_mut() {
            line.push(RenderNode::from_token(token));
        }
    }
    lines
}
