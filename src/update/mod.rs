//! Update functions for the Elm-style architecture
//!
//! All session state transformations flow through these functions. Each
//! call returns the events it produced, in emission order.

mod candidate;
mod caret;
mod edit;
mod value;

use crate::events::MentionEvent;
use crate::messages::{CandidateMsg, CaretMsg, Direction, EditMsg, Key, Msg};
use crate::session::MentionSession;

#[cfg(debug_assertions)]
use crate::tracing::SessionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use candidate::update_candidate;
pub use caret::update_caret;
pub use edit::update_edit;
pub use value::update_value;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(session: &mut MentionSession, msg: Msg) -> Vec<MentionEvent> {
    #[cfg(debug_assertions)]
    {
        update_traced(session, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(session, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(session: &mut MentionSession, msg: Msg) -> Vec<MentionEvent> {
    let mut events = Vec::new();
    match msg {
        Msg::Edit(m) => edit::update_edit(session, m, &mut events),
        Msg::Caret(m) => caret::update_caret(session, m, &mut events),
        Msg::Candidate(m) => candidate::update_candidate(session, m, &mut events),
        Msg::Value(m) => value::update_value(session, m, &mut events),
        Msg::Key(key) => route_key(session, key, &mut events),
        Msg::Focus => {
            if !session.config.disabled && !session.focused {
                session.focused = true;
                events.push(MentionEvent::Focus);
            }
        }
        Msg::Blur => {
            if session.focused {
                session.focused = false;
                session.close_trigger(&mut events);
                events.push(MentionEvent::Blur);
            }
        }
    }
    events
}

/// Keys go to the candidate list while a trigger is open, otherwise to the surface
fn route_key(session: &mut MentionSession, key: Key, events: &mut Vec<MentionEvent>) {
    if session.trigger_ctx.is_some() {
        let popup_msg = match key {
            Key::ArrowDown => Some(CandidateMsg::Next),
            Key::ArrowUp => Some(CandidateMsg::Prev),
            Key::Enter if session.candidates.highlighted_item().is_some() => {
                Some(CandidateMsg::SelectHighlighted)
            }
            Key::Escape => Some(CandidateMsg::Dismiss),
            _ => None,
        };
        if let Some(m) = popup_msg {
            return candidate::update_candidate(session, m, events);
        }
    }

    match key {
        Key::ArrowLeft => caret::update_caret(session, CaretMsg::Move(Direction::Left), events),
        Key::ArrowRight => caret::update_caret(session, CaretMsg::Move(Direction::Right), events),
        Key::Home => caret::update_caret(session, CaretMsg::MoveToStart, events),
        Key::End => caret::update_caret(session, CaretMsg::MoveToEnd, events),
        Key::Backspace => edit::update_edit(session, EditMsg::DeleteBackward, events),
        Key::Delete => edit::update_edit(session, EditMsg::DeleteForward, events),
        Key::Enter => edit::update_edit(session, EditMsg::InsertNewline, events),
        Key::ArrowUp | Key::ArrowDown | Key::Escape => {}
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after session state, logs the diff and checks invariants.
#[cfg(debug_assertions)]
fn update_traced(session: &mut MentionSession, msg: Msg) -> Vec<MentionEvent> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = SessionSnapshot::from_session(session);
    debug!(target: "message", msg = %msg_name, "processing");

    let events = update_inner(session, msg);

    let after = SessionSnapshot::from_session(session);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "session", %diff, "state changed");
    }
    if !events.is_empty() {
        let names: Vec<&str> = events.iter().map(MentionEvent::name).collect();
        debug!(target: "message", events = ?names, "emitted");
    }

    session.assert_invariants();
    events
}

/// Get a display name for a message type
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Edit(m) => format!("Edit::{:?}", m),
        Msg::Caret(m) => format!("Caret::{:?}", m),
        Msg::Candidate(m) => format!("Candidate::{:?}", m),
        Msg::Value(m) => format!("Value::{:?}", m),
        Msg::Key(k) => format!("Key::{:?}", k),
        Msg::Focus => "Focus".to_string(),
        Msg::Blur => "Blur".to_string(),
    }
}
