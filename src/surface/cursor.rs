//! Caret anchor type for the editable surface.

use serde::{Deserialize, Serialize};

/// A caret position on the surface: a node index and an offset inside it.
///
/// For text-bearing nodes the offset is a char offset in `0..=len`. A mention
/// node is atomic, so its offset is 0 (before the token) or 1 (after it).
/// On an empty surface the only anchor is `(0, 0)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CursorAnchor {
    pub node: usize,
    pub offset: usize,
}

impl CursorAnchor {
    pub const fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }

    pub const fn zero() -> Self {
        Self { node: 0, offset: 0 }
    }
}

impl From<(usize, usize)> for CursorAnchor {
    fn from((node, offset): (usize, usize)) -> Self {
        Self::new(node, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_ordering() {
        let a = CursorAnchor::new(0, 5);
        let b = CursorAnchor::new(1, 0);
        let c = CursorAnchor::new(1, 3);

        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
    }

    #[test]
    fn test_anchor_from_tuple() {
        let a: CursorAnchor = (2, 4).into();
        assert_eq!(a, CursorAnchor::new(2, 4));
        assert_eq!(CursorAnchor::zero(), CursorAnchor::default());
    }
}
