//! Surface nodes: the mutable ordered children of the editable area.

use std::borrow::Cow;

use crate::model::{MentionValue, TokenType};
use crate::trigger::TokenAppearance;
use crate::util::{char_len, strip_fillers};

/// Metadata attached to a mention token
#[derive(Debug, Clone, PartialEq)]
pub struct MentionMeta {
    pub trigger: char,
    pub label: String,
    pub value: MentionValue,
    pub extra: Option<serde_json::Value>,
}

/// An atomic, non-editable token.
///
/// `display` is what the token shows (`trigger + label`). `meta` can be lost
/// through external mutation; such a token then reads back as plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionNode {
    pub display: String,
    pub meta: Option<MentionMeta>,
    pub token_type: TokenType,
    pub closable: bool,
}

impl MentionNode {
    pub fn new(meta: MentionMeta, appearance: TokenAppearance) -> Self {
        Self {
            display: format!("{}{}", meta.trigger, meta.label),
            meta: Some(meta),
            token_type: appearance.token_type,
            closable: appearance.closable,
        }
    }

    /// Metadata, if present and usable
    pub fn valid_meta(&self) -> Option<&MentionMeta> {
        self.meta.as_ref().filter(|m| !m.label.is_empty())
    }
}

/// A child of the surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceNode {
    /// Plain text run (may contain zero-width fillers)
    Text(String),
    /// Mention token
    Mention(MentionNode),
    /// Any other text-bearing element (e.g. a wrapper left by a paste)
    Element(String),
}

impl SurfaceNode {
    pub fn text(text: impl Into<String>) -> Self {
        SurfaceNode::Text(text.into())
    }

    pub fn is_mention(&self) -> bool {
        matches!(self, SurfaceNode::Mention(_))
    }

    pub fn as_mention(&self) -> Option<&MentionNode> {
        match self {
            SurfaceNode::Mention(m) => Some(m),
            _ => None,
        }
    }

    /// Raw text of a text-bearing node, `None` for mentions
    pub fn text_content(&self) -> Option<&str> {
        match self {
            SurfaceNode::Text(t) | SurfaceNode::Element(t) => Some(t),
            SurfaceNode::Mention(_) => None,
        }
    }

    pub(crate) fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            SurfaceNode::Text(t) | SurfaceNode::Element(t) => Some(t),
            SurfaceNode::Mention(_) => None,
        }
    }

    pub fn is_text_bearing(&self) -> bool {
        !self.is_mention()
    }

    /// Number of caret steps across this node (mentions count as one)
    pub fn unit_len(&self) -> usize {
        match self {
            SurfaceNode::Text(t) | SurfaceNode::Element(t) => char_len(t),
            SurfaceNode::Mention(_) => 1,
        }
    }

    /// Text this node contributes to the visible plain text
    pub fn visible_text(&self) -> Cow<'_, str> {
        match self {
            SurfaceNode::Text(t) | SurfaceNode::Element(t) => strip_fillers(t),
            SurfaceNode::Mention(m) => match m.valid_meta() {
                Some(meta) => Cow::Owned(format!("{}{}", meta.trigger, meta.label)),
                None => strip_fillers(&m.display),
            },
        }
    }

    /// Same kind of node holding different text (used when splitting)
    pub(crate) fn with_text(&self, text: String) -> Self {
        match self {
            SurfaceNode::Element(_) => SurfaceNode::Element(text),
            _ => SurfaceNode::Text(text),
        }
    }
}
