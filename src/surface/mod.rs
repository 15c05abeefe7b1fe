//! The editable surface as a plain ordered node sequence.
//!
//! This stands in for the browser's editable element: a flat list of text
//! runs and atomic mention tokens, with an explicit caret instead of an
//! ambient global selection.
//!
//! # Architecture
//!
//! - [`SurfaceNode`]: one child of the surface (text, mention token, other element)
//! - [`CursorAnchor`]: `(node, offset)` caret handle
//! - [`Selection`]: anchor/head pair of cursor anchors
//! - [`Surface`]: the node list plus selection, with the editing primitives a
//!   host's input loop applies (insert, backspace, delete, splice, caret moves)
//!
//! # Example
//!
//! ```ignore
//! use mention::surface::{Surface, SurfaceNode};
//!
//! let mut surface = Surface::from_nodes(vec![SurfaceNode::text("Hi @al")]);
//! surface.insert_text("ice");
//! assert_eq!(surface.visible_text(), "Hi @alice");
//! ```

mod cursor;
mod node;
mod selection;
mod state;

pub use cursor::CursorAnchor;
pub use node::{MentionMeta, MentionNode, SurfaceNode};
pub use selection::Selection;
pub use state::Surface;
