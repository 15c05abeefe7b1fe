//! Caret trigger scanner: finds the trigger the caret is currently typing after.
//!
//! Runs on every text change. The walk goes backward from the caret one
//! char at a time and stops at the first trigger, whitespace, or mention
//! token, so the cost is the distance to the trigger rather than the size
//! of the document.

use serde::{Deserialize, Serialize};

use crate::surface::{CursorAnchor, Surface, SurfaceNode};
use crate::trigger::TriggerRegistry;
use crate::util::{char_to_byte, is_boundary, looks_like_email, strip_fillers};

/// Surface range covering `<trigger><query>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRange {
    /// Anchor sitting just before the trigger char
    pub start: CursorAnchor,
    /// The caret the scan started from
    pub end: CursorAnchor,
}

/// A live trigger found left of the caret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMatch {
    pub trigger: char,
    pub query: String,
    pub range: TriggerRange,
}

/// Scan backward from `caret` for an open trigger.
///
/// Returns `None` when whitespace or a mention token comes before any
/// trigger, or when the start of the surface is reached. An `@` that looks
/// like part of an email address is skipped and the scan continues left.
/// With adjacent triggers (`@#`) the rightmost one wins.
pub fn scan_from_caret(
    surface: &Surface,
    caret: CursorAnchor,
    registry: &TriggerRegistry,
) -> Option<TriggerMatch> {
    let nodes = surface.nodes();
    if nodes.is_empty() || registry.triggers().is_empty() {
        return None;
    }
    let caret = surface.clamp(caret);
    let mut idx = caret.node;
    let mut offset = caret.offset;
    let mut tail = String::new();

    if let SurfaceNode::Mention(_) = &nodes[idx] {
        if offset > 0 {
            tracing::trace!(target: "scanner", "caret right after a mention");
            return None;
        }
        idx = idx.checked_sub(1)?;
        offset = nodes[idx].unit_len();
    }

    loop {
        let text = nodes[idx].text_content()?;
        let prefix = &text[..char_to_byte(text, offset)];

        for (byte, ch) in prefix.char_indices().rev() {
            if registry.is_trigger(ch) {
                let after = byte + ch.len_utf8();
                if ch == '@' {
                    let prev = match prefix[..byte].chars().next_back() {
                        Some(p) => Some(p),
                        None => surface.char_before(CursorAnchor::new(idx, 0)),
                    };
                    let after_trigger = CursorAnchor::new(idx, text[..after].chars().count());
                    let next = surface.char_after(after_trigger);
                    if looks_like_email(prev, next) {
                        tracing::trace!(target: "scanner", node = idx, "email-like @ skipped");
                        continue;
                    }
                }
                let mut query = strip_fillers(&prefix[after..]).into_owned();
                query.push_str(&tail);
                let start = CursorAnchor::new(idx, prefix[..byte].chars().count());
                tracing::debug!(target: "scanner", trigger = %ch, query = %query, "trigger found");
                return Some(TriggerMatch {
                    trigger: ch,
                    query,
                    range: TriggerRange { start, end: caret },
                });
            }
            if is_boundary(ch) {
                tracing::trace!(target: "scanner", "whitespace before any trigger");
                return None;
            }
        }

        tail.insert_str(0, &strip_fillers(prefix));
        idx = idx.checked_sub(1)?;
        if nodes[idx].is_mention() {
            return None;
        }
        offset = nodes[idx].unit_len();
    }
}
