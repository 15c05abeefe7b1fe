//! Candidate popup handlers

use crate::events::MentionEvent;
use crate::messages::CandidateMsg;
use crate::session::MentionSession;

/// Navigate, commit or dismiss. Ignored while no trigger is open.
pub fn update_candidate(
    session: &mut MentionSession,
    msg: CandidateMsg,
    events: &mut Vec<MentionEvent>,
) {
    if session.trigger_ctx.is_none() {
        return;
    }

    match msg {
        CandidateMsg::Next => session.candidates.next(),
        CandidateMsg::Prev => session.candidates.prev(),
        CandidateMsg::Hover(index) => session.candidates.hover(index),
        CandidateMsg::SelectHighlighted => {
            if let Some(item) = session.candidates.highlighted_item().cloned() {
                session.commit(item, events);
            }
        }
        CandidateMsg::Select(index) => {
            if let Some(item) = session.candidates.items().get(index).cloned() {
                session.commit(item, events);
            }
        }
        CandidateMsg::Dismiss => session.close_trigger(events),
    }
}
