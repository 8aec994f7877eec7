//! Editing model - the buffer, the cursor, and the session tying them to
//! the highlighting pipeline

pub mod cursor;
pub mod document;
pub mod position;
pub mod session;

pub use cursor::Cursor;
pub use document::Document;
pub use position::{EofMode, Location, PositionIndex};
pub use session::{EditResult, EditorSession};
