//! Render tree
//!
//! The presentation-facing mirror of the current token block.

pub mod tree;

pub use tree::{NodePosition, RenderLine, RenderNode, RenderTree};
