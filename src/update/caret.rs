//! Caret and selection handlers

use crate::events::MentionEvent;
use crate::messages::{CaretMsg, Direction};
use crate::session::MentionSession;

/// Move the caret, then keep or close the open trigger
pub fn update_caret(session: &mut MentionSession, msg: CaretMsg, events: &mut Vec<MentionEvent>) {
    if session.config.disabled {
        return;
    }

    let surface = &mut session.surface;
    match msg {
        CaretMsg::Move(Direction::Left) => surface.move_left(false),
        CaretMsg::Move(Direction::Right) => surface.move_right(false),
        CaretMsg::MoveWithSelection(Direction::Left) => surface.move_left(true),
        CaretMsg::MoveWithSelection(Direction::Right) => surface.move_right(true),
        CaretMsg::MoveToStart => surface.move_to_start(false),
        CaretMsg::MoveToEnd => surface.move_to_end(false),
        CaretMsg::Set(anchor) => surface.set_caret(anchor),
        CaretMsg::Select { anchor, head } => surface.select(anchor, head),
        CaretMsg::SelectAll => surface.select_all(),
    }

    session.track_caret(events);
}
