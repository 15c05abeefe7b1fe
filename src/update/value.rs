//! Host-driven value, option and token handlers

use crate::events::MentionEvent;
use crate::messages::ValueMsg;
use crate::model::Segment;
use crate::parser::BatchParser;
use crate::session::MentionSession;
use crate::surface::SurfaceNode;

pub fn update_value(session: &mut MentionSession, msg: ValueMsg, events: &mut Vec<MentionEvent>) {
    match msg {
        ValueMsg::SetValue(text) => {
            let segments = if text.is_empty() {
                Vec::new()
            } else {
                vec![Segment::text(text)]
            };
            session.replace_content(&segments, events);
        }

        ValueMsg::SetSegments(segments) => session.replace_content(&segments, events),

        ValueMsg::SetModel(model) => {
            let segments = model.to_segments();
            session.replace_content(&segments, events);
        }

        ValueMsg::SetOptions(items) => {
            tracing::debug!(count = items.len(), "options replaced");
            session.registry.set_options(items);
            session.refresh_candidates();
        }

        ValueMsg::SetLoading(loading) => session.loading = loading,

        ValueMsg::Reparse => {
            let text = session.text().to_string();
            let segments =
                BatchParser::new(&session.registry, session.config.parse_strategy).parse(&text);
            session.replace_content(&segments, events);
        }

        ValueMsg::CloseToken(index) => {
            if !session.is_editable() {
                return;
            }
            let closable = matches!(
                session.surface.nodes().get(index),
                Some(SurfaceNode::Mention(m)) if m.closable
            );
            if !closable {
                tracing::debug!(index, "CloseToken on a node that is not a closable mention");
                return;
            }
            if let Some(SurfaceNode::Mention(token)) = session.surface.remove_node(index) {
                session.after_edit(Some(token), events);
            }
        }
    }
}
