//! Events emitted to the host, in the order they happened

use serde::Serialize;

use crate::model::{MentionEntity, MentionItem, MentionValue, Segment};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum MentionEvent {
    /// The live query of an open trigger changed
    Search { value: String, trigger: char },
    /// A candidate was committed
    Select { value: MentionItem, trigger: char },
    /// A mention token was deleted
    Remove {
        value: MentionValue,
        label: String,
        trigger: char,
    },
    /// Visible plain text after an edit
    Change(String),
    /// Structured value after an edit
    ValueChange {
        text: String,
        mentions: Vec<MentionEntity>,
        model: Vec<Segment>,
    },
    Focus,
    Blur,
    /// Popup should open; `caret` is the visible-text offset of the caret
    PopupOpened { caret: usize },
    PopupClosed,
}

impl MentionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MentionEvent::Search { .. } => "search",
            MentionEvent::Select { .. } => "select",
            MentionEvent::Remove { .. } => "remove",
            MentionEvent::Change(_) => "change",
            MentionEvent::ValueChange { .. } => "valueChange",
            MentionEvent::Focus => "focus",
            MentionEvent::Blur => "blur",
            MentionEvent::PopupOpened { .. } => "popupOpened",
            MentionEvent::PopupClosed => "popupClosed",
        }
    }
}
