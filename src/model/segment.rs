//! Segment sequence and its offset-based twin, the mention model

use serde::{Deserialize, Serialize};

use super::item::MentionValue;
use crate::util::{char_len, char_slice};

/// One atomic unit of content: plain text or a mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Text {
        text: String,
    },
    Mention {
        trigger: char,
        label: String,
        value: MentionValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra: Option<serde_json::Value>,
    },
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    pub fn mention(trigger: char, label: impl Into<String>, value: impl Into<MentionValue>) -> Self {
        Segment::Mention {
            trigger,
            label: label.into(),
            value: value.into(),
            extra: None,
        }
    }

    pub fn is_mention(&self) -> bool {
        matches!(self, Segment::Mention { .. })
    }

    /// Text this segment contributes to the visible plain text
    pub fn visible_text(&self) -> String {
        match self {
            Segment::Text { text } => text.clone(),
            Segment::Mention { trigger, label, .. } => format!("{}{}", trigger, label),
        }
    }

    /// Visible length in chars
    pub fn visible_len(&self) -> usize {
        match self {
            Segment::Text { text } => char_len(text),
            Segment::Mention { label, .. } => 1 + char_len(label),
        }
    }
}

/// Concatenate segments into the visible plain text
pub fn plain_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg {
            Segment::Text { text } => out.push_str(text),
            Segment::Mention { trigger, label, .. } => {
                out.push(*trigger);
                out.push_str(label);
            }
        }
    }
    out
}

/// A mention located by char offsets into the visible plain text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionEntity {
    pub value: MentionValue,
    pub label: String,
    pub trigger: char,
    pub start: usize,
    /// Always `1 + label.chars().count()`
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl MentionEntity {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// In bounds of `text` and covering exactly `trigger + label` there
    pub fn matches_text(&self, text: &str) -> bool {
        if self.end() > char_len(text) || self.length != 1 + char_len(&self.label) {
            return false;
        }
        let covered = char_slice(text, self.start..self.end());
        covered.starts_with(self.trigger) && covered[self.trigger.len_utf8()..] == self.label
    }
}

/// Visible text plus mention entities: the flattened view of a segment sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionModel {
    pub text: String,
    #[serde(default)]
    pub mentions: Vec<MentionEntity>,
}

impl MentionModel {
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut text = String::new();
        let mut mentions = Vec::new();
        let mut pos = 0;

        for seg in segments {
            match seg {
                Segment::Text { text: t } => {
                    text.push_str(t);
                    pos += char_len(t);
                }
                Segment::Mention {
                    trigger,
                    label,
                    value,
                    extra,
                } => {
                    let length = 1 + char_len(label);
                    mentions.push(MentionEntity {
                        value: value.clone(),
                        label: label.clone(),
                        trigger: *trigger,
                        start: pos,
                        length,
                        extra: extra.clone(),
                    });
                    text.push(*trigger);
                    text.push_str(label);
                    pos += length;
                }
            }
        }

        Self { text, mentions }
    }

    /// Rebuild the segment sequence.
    ///
    /// Entities are taken in `start` order. An entity that overlaps its
    /// predecessor, runs past the end of the text, or does not cover
    /// `trigger + label` is dropped, leaving its characters as plain text.
    pub fn to_segments(&self) -> Vec<Segment> {
        let text_len = char_len(&self.text);
        let mut sorted: Vec<&MentionEntity> = self.mentions.iter().collect();
        sorted.sort_by_key(|m| m.start);

        let mut segments = Vec::new();
        let mut idx = 0;
        for m in sorted {
            if m.start < idx || !m.matches_text(&self.text) {
                tracing::warn!(
                    start = m.start,
                    label = %m.label,
                    "Dropping overlapping or mismatched mention entity"
                );
                continue;
            }
            let before = char_slice(&self.text, idx..m.start);
            if !before.is_empty() {
                segments.push(Segment::text(before));
            }
            segments.push(Segment::Mention {
                trigger: m.trigger,
                label: m.label.clone(),
                value: m.value.clone(),
                extra: m.extra.clone(),
            });
            idx = m.end();
        }
        let tail = char_slice(&self.text, idx..text_len);
        if !tail.is_empty() {
            segments.push(Segment::text(tail));
        }
        segments
    }

    /// Entities are ordered, non-overlapping, in bounds, and each covers exactly `trigger + label`
    pub fn is_well_formed(&self) -> bool {
        let mut prev_end = 0;
        for (i, m) in self.mentions.iter().enumerate() {
            if (i > 0 && m.start < prev_end) || !m.matches_text(&self.text) {
                return false;
            }
            prev_end = m.end();
        }
        true
    }
}

/// Parse a JSON segment array, `None` when malformed
pub fn segments_from_json(json: &str) -> Option<Vec<Segment>> {
    match serde_json::from_str::<Vec<Segment>>(json) {
        Ok(segments) => Some(segments),
        Err(e) => {
            tracing::warn!("Ignoring malformed segments JSON: {}", e);
            None
        }
    }
}

/// Parse a JSON `{text, mentions}` model, `None` when malformed
pub fn model_from_json(json: &str) -> Option<MentionModel> {
    match serde_json::from_str::<MentionModel>(json) {
        Ok(model) => Some(model),
        Err(e) => {
            tracing::warn!("Ignoring malformed model JSON: {}", e);
            None
        }
    }
}
