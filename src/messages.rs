//! Message types for the Elm-style architecture
//!
//! All session state changes flow through these message types.

use serde::{Deserialize, Serialize};

use crate::model::{MentionItem, MentionModel, Segment};
use crate::surface::CursorAnchor;

/// Direction for caret movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// Keys with routing that depends on the popup state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Backspace,
    Delete,
    Home,
    End,
}

/// Surface edits typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum EditMsg {
    /// Insert text at the caret, replacing any selection
    InsertText(String),
    /// Bulk-parse pasted text and splice it at the caret
    Paste(String),
    /// Backspace
    DeleteBackward,
    /// Forward delete
    DeleteForward,
    /// Enter outside the popup (multiline only)
    InsertNewline,
}

/// Caret and selection changes
#[derive(Debug, Clone, PartialEq)]
pub enum CaretMsg {
    Move(Direction),
    /// Shift+Arrow
    MoveWithSelection(Direction),
    MoveToStart,
    MoveToEnd,
    /// Place the caret (pointer click)
    Set(CursorAnchor),
    Select {
        anchor: CursorAnchor,
        head: CursorAnchor,
    },
    SelectAll,
}

/// Candidate popup interaction
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateMsg {
    Next,
    Prev,
    /// Pointer hover over a candidate row
    Hover(usize),
    /// Commit the highlighted candidate
    SelectHighlighted,
    /// Commit the candidate at an index (pointer click)
    Select(usize),
    /// Close the popup without committing
    Dismiss,
}

/// Host-driven value and option changes
#[derive(Debug, Clone, PartialEq)]
pub enum ValueMsg {
    /// Replace the content with one plain text run
    SetValue(String),
    SetSegments(Vec<Segment>),
    SetModel(MentionModel),
    /// Replace the global candidate list
    SetOptions(Vec<MentionItem>),
    SetLoading(bool),
    /// Reparse the whole visible text
    Reparse,
    /// Close button on the token at this node index
    CloseToken(usize),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Edit(EditMsg),
    Caret(CaretMsg),
    Candidate(CandidateMsg),
    Value(ValueMsg),
    /// Raw key press, routed by popup state
    Key(Key),
    Focus,
    Blur,
}

impl From<EditMsg> for Msg {
    fn from(m: EditMsg) -> Self {
        Msg::Edit(m)
    }
}

impl From<CaretMsg> for Msg {
    fn from(m: CaretMsg) -> Self {
        Msg::Caret(m)
    }
}

impl From<CandidateMsg> for Msg {
    fn from(m: CandidateMsg) -> Self {
        Msg::Candidate(m)
    }
}

impl From<ValueMsg> for Msg {
    fn from(m: ValueMsg) -> Self {
        Msg::Value(m)
    }
}
