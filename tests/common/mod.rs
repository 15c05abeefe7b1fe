//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use mention::config::MentionConfig;
use mention::events::MentionEvent;
use mention::messages::{EditMsg, Msg};
use mention::model::{MentionItem, MentionValue, TokenType};
use mention::session::MentionSession;
use mention::surface::{MentionMeta, MentionNode, SurfaceNode};
use mention::trigger::{TokenAppearance, TriggerRegistry};
use mention::update::update;

/// The usual candidate list: alice, bob, carol
pub fn users() -> Vec<MentionItem> {
    vec![
        MentionItem::new(1, "alice"),
        MentionItem::new(2, "bob"),
        MentionItem::new(3, "carol"),
    ]
}

/// Registry for the given triggers, with [`users`] as the global options
pub fn registry(triggers: &[char]) -> TriggerRegistry {
    let mut registry = TriggerRegistry::new(triggers.to_vec());
    registry.set_options(users());
    registry
}

/// Config with `@` and [`users`] as options
pub fn test_config() -> MentionConfig {
    MentionConfig {
        options: users(),
        ..Default::default()
    }
}

/// Session with [`test_config`] and `text` as the initial value
pub fn test_session(text: &str) -> MentionSession {
    MentionSession::new(MentionConfig {
        value: Some(text.to_string()),
        ..test_config()
    })
}

/// Type `text` one char at a time, collecting every event
pub fn type_text(session: &mut MentionSession, text: &str) -> Vec<MentionEvent> {
    text.chars()
        .flat_map(|c| update(session, Msg::Edit(EditMsg::InsertText(c.to_string()))))
        .collect()
}

/// Send one message
pub fn send(session: &mut MentionSession, msg: impl Into<Msg>) -> Vec<MentionEvent> {
    update(session, msg.into())
}

pub fn event_names(events: &[MentionEvent]) -> Vec<&'static str> {
    events.iter().map(MentionEvent::name).collect()
}

pub fn count_events(events: &[MentionEvent], name: &str) -> usize {
    events.iter().filter(|e| e.name() == name).count()
}

/// A plain `@` mention token node
pub fn mention_node(label: &str, value: impl Into<MentionValue>) -> SurfaceNode {
    SurfaceNode::Mention(MentionNode::new(
        MentionMeta {
            trigger: '@',
            label: label.to_string(),
            value: value.into(),
            extra: None,
        },
        TokenAppearance {
            token_type: TokenType::Default,
            closable: true,
        },
    ))
}
