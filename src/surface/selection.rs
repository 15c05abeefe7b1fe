//! Selection type for the editable surface.

use super::cursor::CursorAnchor;

/// A selection with anchor (fixed point) and head (caret).
/// Anchors are kept in canonical form by the surface, so equal anchors mean equal positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: CursorAnchor,
    /// Where the caret is (moving point)
    pub head: CursorAnchor,
}

impl Selection {
    pub fn new(anchor: CursorAnchor, head: CursorAnchor) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret with no selection)
    pub fn collapsed(pos: CursorAnchor) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> CursorAnchor {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> CursorAnchor {
        self.anchor.max(self.head)
    }

    /// Check if selection is reversed (head before anchor)
    pub fn is_reversed(&self) -> bool {
        self.head < self.anchor
    }
}
