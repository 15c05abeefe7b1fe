//! Surface edit handlers

use crate::events::MentionEvent;
use crate::messages::EditMsg;
use crate::session::MentionSession;

/// Handle surface edits. Read-only and disabled sessions ignore them.
pub fn update_edit(session: &mut MentionSession, msg: EditMsg, events: &mut Vec<MentionEvent>) {
    if !session.is_editable() {
        tracing::debug!("Edit ignored on read-only session: {:?}", msg);
        return;
    }

    match msg {
        EditMsg::InsertText(text) => {
            if text.is_empty() {
                return;
            }
            session.surface.insert_text(&text);
            session.after_edit(None, events);
        }

        EditMsg::Paste(text) => {
            let nodes = session.parse_to_nodes(&text);
            if nodes.is_empty() && session.surface.is_collapsed() {
                return;
            }
            let sel = *session.surface.selection();
            session.surface.splice(sel.start(), sel.end(), nodes);
            session.after_edit(None, events);
        }

        EditMsg::DeleteBackward => {
            let surface = &session.surface;
            if surface.is_collapsed() && surface.position(surface.caret()) == 0 {
                return;
            }
            let removed = session.surface.delete_backward();
            session.after_edit(removed, events);
        }

        EditMsg::DeleteForward => {
            let surface = &session.surface;
            if surface.is_collapsed() && surface.position(surface.caret()) == surface.len_units() {
                return;
            }
            let removed = session.surface.delete_forward();
            session.after_edit(removed, events);
        }

        EditMsg::InsertNewline => {
            if !session.config.multiline {
                tracing::trace!("Newline blocked in single-line input");
                return;
            }
            session.surface.insert_text("\n");
            session.after_edit(None, events);
        }
    }
}
