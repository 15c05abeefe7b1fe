//! Surface - the editable node sequence with its caret and selection.
//!
//! Positions are measured in caret units: one per char of a text-bearing node,
//! one per mention token. Every edit is expressed on those units and the
//! caret is re-anchored in canonical form afterwards.

use super::cursor::CursorAnchor;
use super::node::{MentionNode, SurfaceNode};
use super::selection::Selection;
use crate::util::{char_len, char_to_byte, is_filler};

/// The mutable editable area
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    nodes: Vec<SurfaceNode>,
    selection: Selection,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a surface from nodes with the caret at the end
    pub fn from_nodes(nodes: Vec<SurfaceNode>) -> Self {
        let mut surface = Self {
            nodes,
            selection: Selection::default(),
        };
        surface.normalize_at(surface.len_units(), surface.len_units());
        surface
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace every node, caret at the end
    pub fn set_nodes(&mut self, nodes: Vec<SurfaceNode>) {
        self.nodes = nodes;
        let end = self.len_units();
        self.normalize_at(end, end);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn caret(&self) -> CursorAnchor {
        self.selection.head
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.is_collapsed()
    }

    /// Total caret units
    pub fn len_units(&self) -> usize {
        self.nodes.iter().map(SurfaceNode::unit_len).sum()
    }

    /// Visible plain text (fillers stripped, mentions as `trigger + label`)
    pub fn visible_text(&self) -> String {
        self.nodes.iter().map(|n| n.visible_text()).collect()
    }

    // =========================================================================
    // Anchors and positions
    // =========================================================================

    /// Clamp an anchor to an existing node and a valid offset in it
    pub fn clamp(&self, anchor: CursorAnchor) -> CursorAnchor {
        if self.nodes.is_empty() {
            return CursorAnchor::zero();
        }
        let node = anchor.node.min(self.nodes.len() - 1);
        let offset = anchor.offset.min(self.nodes[node].unit_len());
        CursorAnchor::new(node, offset)
    }

    /// Caret units before an anchor
    pub fn position(&self, anchor: CursorAnchor) -> usize {
        let a = self.clamp(anchor);
        let before: usize = self.nodes[..a.node.min(self.nodes.len())]
            .iter()
            .map(SurfaceNode::unit_len)
            .sum();
        before + a.offset
    }

    /// Canonical anchor for a position.
    ///
    /// Inside or at the end of a text-bearing node the anchor points into
    /// that node; right after a mention it points at the start of the
    /// following text node when there is one.
    pub fn anchor_at(&self, pos: usize) -> CursorAnchor {
        let mut acc = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let len = node.unit_len();
            if node.is_text_bearing() {
                if pos <= acc + len {
                    return CursorAnchor::new(i, pos.saturating_sub(acc));
                }
            } else if pos == acc {
                return CursorAnchor::new(i, 0);
            } else if pos == acc + len {
                return match self.nodes.get(i + 1) {
                    Some(next) if next.is_text_bearing() => CursorAnchor::new(i + 1, 0),
                    _ => CursorAnchor::new(i, 1),
                };
            }
            acc += len;
        }
        self.end_anchor()
    }

    pub fn start_anchor(&self) -> CursorAnchor {
        self.anchor_at(0)
    }

    pub fn end_anchor(&self) -> CursorAnchor {
        match self.nodes.last() {
            None => CursorAnchor::zero(),
            Some(node) => CursorAnchor::new(self.nodes.len() - 1, node.unit_len()),
        }
    }

    /// Offset of an anchor in the visible plain text
    pub fn visible_offset(&self, anchor: CursorAnchor) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let a = self.clamp(anchor);
        let before: usize = self.nodes[..a.node]
            .iter()
            .map(|n| char_len(&n.visible_text()))
            .sum();
        let within = match &self.nodes[a.node] {
            SurfaceNode::Mention(_) => a.offset * char_len(&self.nodes[a.node].visible_text()),
            node => node
                .text_content()
                .map(|t| t.chars().take(a.offset).filter(|c| !is_filler(*c)).count())
                .unwrap_or(0),
        };
        before + within
    }

    /// The char immediately before an anchor, looking into the previous
    /// text-bearing node if needed. Mentions yield `None`.
    pub fn char_before(&self, anchor: CursorAnchor) -> Option<char> {
        let a = self.clamp(anchor);
        let node = self.nodes.get(a.node)?;
        match node.text_content() {
            Some(text) if a.offset > 0 => text.chars().nth(a.offset - 1),
            Some(_) if a.node > 0 => self.nodes[a.node - 1]
                .text_content()
                .and_then(|t| t.chars().next_back()),
            _ => None,
        }
    }

    /// The first visible char at or after an anchor, continuing into the
    /// following text nodes. Fillers are skipped and a mention yields `None`.
    pub fn char_after(&self, anchor: CursorAnchor) -> Option<char> {
        let a = self.clamp(anchor);
        let mut skip = a.offset;
        for node in self.nodes.get(a.node..)? {
            let text = node.text_content()?;
            if let Some(ch) = text.chars().skip(skip).find(|c| !is_filler(*c)) {
                return Some(ch);
            }
            skip = 0;
        }
        None
    }

    // =========================================================================
    // Caret and selection
    // =========================================================================

    pub fn set_caret(&mut self, anchor: CursorAnchor) {
        let pos = self.position(anchor);
        self.selection = Selection::collapsed(self.anchor_at(pos));
    }

    pub fn select(&mut self, anchor: CursorAnchor, head: CursorAnchor) {
        let a = self.anchor_at(self.position(anchor));
        let h = self.anchor_at(self.position(head));
        self.selection = Selection::new(a, h);
    }

    /// Move the caret one unit left; a mention is crossed in one step
    pub fn move_left(&mut self, extend_selection: bool) {
        if !extend_selection && !self.selection.is_collapsed() {
            let start = self.selection.start();
            self.selection = Selection::collapsed(start);
            return;
        }
        let pos = self.position(self.caret()).saturating_sub(1);
        self.move_head_to(pos, extend_selection);
    }

    /// Move the caret one unit right; a mention is crossed in one step
    pub fn move_right(&mut self, extend_selection: bool) {
        if !extend_selection && !self.selection.is_collapsed() {
            let end = self.selection.end();
            self.selection = Selection::collapsed(end);
            return;
        }
        let pos = (self.position(self.caret()) + 1).min(self.len_units());
        self.move_head_to(pos, extend_selection);
    }

    pub fn move_to_start(&mut self, extend_selection: bool) {
        self.move_head_to(0, extend_selection);
    }

    pub fn move_to_end(&mut self, extend_selection: bool) {
        let end = self.len_units();
        self.move_head_to(end, extend_selection);
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(self.start_anchor(), self.anchor_at(self.len_units()));
    }

    fn move_head_to(&mut self, pos: usize, extend_selection: bool) {
        let head = self.anchor_at(pos);
        if extend_selection {
            self.selection.head = head;
        } else {
            self.selection = Selection::collapsed(head);
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Insert text at the caret, replacing any selection
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.selection.is_collapsed() {
            self.delete_selection();
        }
        let pos = self.position(self.caret());
        let inserted = char_len(text);

        if self.nodes.is_empty() {
            self.nodes.push(SurfaceNode::text(text));
        } else {
            let a = self.clamp(self.caret());
            if let Some(t) = self.nodes[a.node].text_mut() {
                let byte = char_to_byte(t, a.offset);
                t.insert_str(byte, text);
            } else if a.offset == 0 {
                match a.node.checked_sub(1).and_then(|p| self.nodes[p].text_mut()) {
                    Some(prev) => prev.push_str(text),
                    None => self.nodes.insert(a.node, SurfaceNode::text(text)),
                }
            } else {
                match self.nodes.get_mut(a.node + 1).and_then(SurfaceNode::text_mut) {
                    Some(next) => next.insert_str(0, text),
                    None => self.nodes.insert(a.node + 1, SurfaceNode::text(text)),
                }
            }
        }
        self.normalize_at(pos + inserted, pos + inserted);
    }

    /// Delete the unit before the caret (Backspace).
    ///
    /// A mention before the caret is removed whole and returned. Fillers
    /// are skipped, so a token followed only by a filler still goes in one
    /// keystroke.
    pub fn delete_backward(&mut self) -> Option<MentionNode> {
        if !self.selection.is_collapsed() {
            self.delete_selection();
            return None;
        }
        let mut pos = self.position(self.caret());
        let mut removed = None;
        while pos > 0 {
            let a = self.locate_before(pos);
            let node = &mut self.nodes[a.node];
            match node.text_mut() {
                Some(t) => {
                    let byte = char_to_byte(t, a.offset - 1);
                    let ch = t.remove(byte);
                    pos -= 1;
                    if !is_filler(ch) {
                        break;
                    }
                }
                None => {
                    if let SurfaceNode::Mention(m) = self.nodes.remove(a.node) {
                        tracing::debug!(target: "surface", display = %m.display, "mention removed by backspace");
                        removed = Some(m);
                    }
                    pos -= 1;
                    break;
                }
            }
        }
        self.normalize_at(pos, pos);
        removed
    }

    /// Delete the unit after the caret (Delete), mirroring [`Self::delete_backward`]
    pub fn delete_forward(&mut self) -> Option<MentionNode> {
        if !self.selection.is_collapsed() {
            self.delete_selection();
            return None;
        }
        let pos = self.position(self.caret());
        let mut removed = None;
        while pos < self.len_units() {
            let a = self.locate_after(pos);
            match self.nodes[a.node].text_mut() {
                Some(t) => {
                    let byte = char_to_byte(t, a.offset);
                    let ch = t.remove(byte);
                    if !is_filler(ch) {
                        break;
                    }
                }
                None => {
                    if let SurfaceNode::Mention(m) = self.nodes.remove(a.node) {
                        tracing::debug!(target: "surface", display = %m.display, "mention removed by delete");
                        removed = Some(m);
                    }
                    break;
                }
            }
        }
        self.normalize_at(pos, pos);
        removed
    }

    /// Remove the selected content
    pub fn delete_selection(&mut self) {
        let sel = self.selection;
        if sel.is_collapsed() {
            return;
        }
        self.splice(sel.start(), sel.end(), Vec::new());
    }

    /// Remove one node, keeping the caret on the same content
    pub fn remove_node(&mut self, index: usize) -> Option<SurfaceNode> {
        if index >= self.nodes.len() {
            return None;
        }
        let node_start = self.position(CursorAnchor::new(index, 0));
        let len = self.nodes[index].unit_len();
        let shift = |pos: usize| {
            if pos >= node_start + len {
                pos - len
            } else {
                pos.min(node_start)
            }
        };
        let anchor = shift(self.position(self.selection.anchor));
        let head = shift(self.position(self.selection.head));
        let removed = self.nodes.remove(index);
        self.normalize_at(anchor, head);
        Some(removed)
    }

    /// Replace the content between two anchors with `insert`, caret after the
    /// inserted nodes. Returns the new caret.
    pub fn splice(
        &mut self,
        from: CursorAnchor,
        to: CursorAnchor,
        insert: Vec<SurfaceNode>,
    ) -> CursorAnchor {
        let (mut from, mut to) = (self.clamp(from), self.clamp(to));
        let (mut from_pos, to_pos) = (self.position(from), self.position(to));
        if from_pos > to_pos {
            std::mem::swap(&mut from, &mut to);
            from_pos = to_pos;
        }
        let inserted: usize = insert.iter().map(SurfaceNode::unit_len).sum();

        let mut end_idx = self.split_at(to);
        let before = self.nodes.len();
        let start_idx = self.split_at(from);
        end_idx += self.nodes.len() - before;

        let removed: Vec<SurfaceNode> = self.nodes.splice(start_idx..end_idx, insert).collect();
        tracing::trace!(target: "surface", removed = removed.len(), inserted, "splice");

        let caret = from_pos + inserted;
        self.normalize_at(caret, caret);
        self.caret()
    }

    /// Split the node under an anchor so that a node boundary sits there.
    /// Returns the index of the first node after the boundary.
    fn split_at(&mut self, anchor: CursorAnchor) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let a = self.clamp(anchor);
        let node = &mut self.nodes[a.node];
        let len = node.unit_len();
        if a.offset == 0 {
            return a.node;
        }
        if a.offset >= len {
            return a.node + 1;
        }
        let rest = match node.text_mut() {
            Some(t) => {
                let byte = char_to_byte(t, a.offset);
                t.split_off(byte)
            }
            None => return a.node + 1,
        };
        let tail = self.nodes[a.node].with_text(rest);
        self.nodes.insert(a.node + 1, tail);
        a.node + 1
    }

    /// Node and offset just before position `pos` (pos > 0)
    fn locate_before(&self, pos: usize) -> CursorAnchor {
        let mut acc = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let len = node.unit_len();
            if pos > acc && pos <= acc + len {
                return CursorAnchor::new(i, pos - acc);
            }
            acc += len;
        }
        self.end_anchor()
    }

    /// Node and offset just after position `pos` (pos < len_units)
    fn locate_after(&self, pos: usize) -> CursorAnchor {
        let mut acc = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let len = node.unit_len();
            if pos >= acc && pos < acc + len {
                return CursorAnchor::new(i, pos - acc);
            }
            acc += len;
        }
        self.end_anchor()
    }

    /// Drop empty text nodes and re-anchor the selection at the given positions
    fn normalize_at(&mut self, anchor_pos: usize, head_pos: usize) {
        self.nodes
            .retain(|n| n.text_content().map_or(true, |t| !t.is_empty()));
        let len = self.len_units();
        let anchor = self.anchor_at(anchor_pos.min(len));
        let head = self.anchor_at(head_pos.min(len));
        self.selection = Selection::new(anchor, head);
    }

    /// Check internal invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(t) = node.text_content() {
                debug_assert!(!t.is_empty(), "Text node {} must not be empty", i);
            }
        }
        for anchor in [self.selection.anchor, self.selection.head] {
            debug_assert_eq!(
                self.clamp(anchor),
                anchor,
                "Selection anchor {:?} must be in bounds",
                anchor
            );
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MentionValue, TokenType};
    use crate::surface::node::MentionMeta;
    use crate::trigger::TokenAppearance;

    fn mention(label: &str) -> SurfaceNode {
        SurfaceNode::Mention(MentionNode::new(
            MentionMeta {
                trigger: '@',
                label: label.to_string(),
                value: MentionValue::Text(label.to_string()),
                extra: None,
            },
            TokenAppearance {
                token_type: TokenType::Default,
                closable: false,
            },
        ))
    }

    fn hi_alice_there() -> Surface {
        Surface::from_nodes(vec![
            SurfaceNode::text("Hi "),
            mention("alice"),
            SurfaceNode::text(" there"),
        ])
    }

    #[test]
    fn test_positions_and_anchors() {
        let s = hi_alice_there();
        assert_eq!(s.len_units(), 3 + 1 + 6);
        assert_eq!(s.anchor_at(3), CursorAnchor::new(0, 3));
        assert_eq!(s.anchor_at(4), CursorAnchor::new(2, 0));
        assert_eq!(s.position(CursorAnchor::new(1, 1)), 4);
        assert_eq!(s.caret(), CursorAnchor::new(2, 6));
        assert_eq!(s.visible_offset(CursorAnchor::new(2, 0)), 9);
    }

    #[test]
    fn test_anchor_after_trailing_mention() {
        let s = Surface::from_nodes(vec![mention("a"), mention("b")]);
        assert_eq!(s.anchor_at(0), CursorAnchor::new(0, 0));
        assert_eq!(s.anchor_at(1), CursorAnchor::new(0, 1));
        assert_eq!(s.anchor_at(2), CursorAnchor::new(1, 1));
    }

    #[test]
    fn test_char_after_crosses_text_nodes() {
        let s = Surface::from_nodes(vec![
            SurfaceNode::text("a@"),
            SurfaceNode::text("\u{200B}b"),
        ]);
        assert_eq!(s.char_after(CursorAnchor::new(0, 1)), Some('@'));
        assert_eq!(s.char_after(CursorAnchor::new(0, 2)), Some('b'));
        assert_eq!(s.char_after(s.end_anchor()), None);
    }

    #[test]
    fn test_insert_text_in_empty_surface() {
        let mut s = Surface::new();
        s.insert_text("hey");
        assert_eq!(s.visible_text(), "hey");
        assert_eq!(s.caret(), CursorAnchor::new(0, 3));
    }

    #[test]
    fn test_insert_after_trailing_mention_creates_text_node() {
        let mut s = Surface::from_nodes(vec![SurfaceNode::text("x "), mention("bob")]);
        assert_eq!(s.caret(), CursorAnchor::new(1, 1));
        s.insert_text("!");
        assert_eq!(s.nodes().len(), 3);
        assert_eq!(s.visible_text(), "x @bob!");
        assert_eq!(s.caret(), CursorAnchor::new(2, 1));
    }

    #[test]
    fn test_backspace_removes_whole_mention() {
        let mut s = hi_alice_there();
        s.set_caret(CursorAnchor::new(1, 1));
        let removed = s.delete_backward().unwrap();
        assert_eq!(removed.display, "@alice");
        assert_eq!(
            s.nodes(),
            &[SurfaceNode::text("Hi "), SurfaceNode::text(" there")]
        );
        assert_eq!(s.caret(), CursorAnchor::new(0, 3));
    }

    #[test]
    fn test_backspace_skips_filler() {
        let mut s = Surface::from_nodes(vec![
            SurfaceNode::text("a "),
            mention("bob"),
            SurfaceNode::text("\u{200B}"),
        ]);
        assert!(s.delete_backward().is_some());
        assert_eq!(s.nodes(), &[SurfaceNode::text("a ")]);
    }

    #[test]
    fn test_backspace_in_text_removes_one_char() {
        let mut s = hi_alice_there();
        assert!(s.delete_backward().is_none());
        assert_eq!(s.visible_text(), "Hi @alice ther");
    }

    #[test]
    fn test_delete_forward_removes_mention() {
        let mut s = hi_alice_there();
        s.set_caret(CursorAnchor::new(0, 3));
        assert!(s.delete_forward().is_some());
        assert_eq!(s.visible_text(), "Hi  there");
        assert_eq!(s.caret(), CursorAnchor::new(0, 3));
    }

    #[test]
    fn test_splice_within_one_node() {
        let mut s = Surface::from_nodes(vec![SurfaceNode::text("Hi @al")]);
        let caret = s.splice(
            CursorAnchor::new(0, 3),
            CursorAnchor::new(0, 6),
            vec![mention("alice"), SurfaceNode::text(" ")],
        );
        assert_eq!(s.visible_text(), "Hi @alice ");
        assert_eq!(caret, CursorAnchor::new(2, 1));
    }

    #[test]
    fn test_splice_across_nodes_and_reversed() {
        let mut s = Surface::from_nodes(vec![
            SurfaceNode::text("ab"),
            SurfaceNode::text("cd"),
            mention("x"),
            SurfaceNode::text("ef"),
        ]);
        s.splice(CursorAnchor::new(3, 1), CursorAnchor::new(0, 1), vec![]);
        assert_eq!(s.nodes(), &[SurfaceNode::text("a"), SurfaceNode::text("f")]);
        assert_eq!(s.caret(), CursorAnchor::new(0, 1));
    }

    #[test]
    fn test_move_crosses_mention_atomically() {
        let mut s = hi_alice_there();
        s.set_caret(CursorAnchor::new(0, 3));
        s.move_right(false);
        assert_eq!(s.caret(), CursorAnchor::new(2, 0));
        s.move_left(false);
        assert_eq!(s.caret(), CursorAnchor::new(0, 3));
    }

    #[test]
    fn test_selection_extend_and_delete() {
        let mut s = hi_alice_there();
        s.set_caret(CursorAnchor::new(0, 2));
        s.move_right(true);
        s.move_right(true);
        s.move_right(true);
        assert!(!s.is_collapsed());
        s.delete_selection();
        assert_eq!(s.visible_text(), "Hithere");
    }

    #[test]
    fn test_remove_node_keeps_caret_on_content() {
        let mut s = hi_alice_there();
        s.remove_node(1);
        assert_eq!(s.visible_text(), "Hi  there");
        assert_eq!(s.caret(), CursorAnchor::new(1, 6));
    }
}
