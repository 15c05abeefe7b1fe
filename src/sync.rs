//! Bridge between the segment model and the editable surface.
//!
//! [`render_segments`] and [`model_from_surface`] are exact inverses on
//! well-formed input: fillers emitted by rendering are stripped again when
//! reading the surface back.

use serde::{Deserialize, Serialize};

use crate::model::{MentionEntity, MentionItem, MentionModel, Segment};
use crate::surface::{CursorAnchor, MentionMeta, MentionNode, Surface, SurfaceNode};
use crate::trigger::TriggerRegistry;
use crate::util::{char_len, FILLER};

/// Structured reading of a surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceModel {
    pub text: String,
    pub mentions: Vec<MentionEntity>,
    pub segments: Vec<Segment>,
}

impl SurfaceModel {
    pub fn to_model(&self) -> MentionModel {
        MentionModel {
            text: self.text.clone(),
            mentions: self.mentions.clone(),
        }
    }
}

/// Build surface nodes for a segment sequence.
///
/// A mention followed by another mention, or by nothing, gets a filler text
/// node after it so the caret has somewhere to land. Empty text segments are
/// skipped.
pub fn render_segments(
    segments: &[Segment],
    registry: &TriggerRegistry,
    read_only: bool,
) -> Vec<SurfaceNode> {
    let mut nodes = Vec::with_capacity(segments.len() + 1);
    for (i, seg) in segments.iter().enumerate() {
        match seg {
            Segment::Text { text } => {
                if !text.is_empty() {
                    nodes.push(SurfaceNode::text(text.clone()));
                }
            }
            Segment::Mention {
                trigger,
                label,
                value,
                extra,
            } => {
                let meta = MentionMeta {
                    trigger: *trigger,
                    label: label.clone(),
                    value: value.clone(),
                    extra: extra.clone(),
                };
                let appearance = registry.appearance(*trigger, None, read_only);
                nodes.push(SurfaceNode::Mention(MentionNode::new(meta, appearance)));

                let needs_filler = match segments.get(i + 1) {
                    None => true,
                    Some(Segment::Mention { .. }) => true,
                    Some(Segment::Text { text }) => text.is_empty(),
                };
                if needs_filler {
                    nodes.push(SurfaceNode::Text(FILLER.to_string()));
                }
            }
        }
    }
    nodes
}

/// Walk the surface children and rebuild segments and entities.
///
/// A mention node whose metadata is missing degrades to a text segment
/// holding its visible text. Adjacent text nodes stay separate segments.
pub fn model_from_surface(nodes: &[SurfaceNode]) -> SurfaceModel {
    let mut model = SurfaceModel::default();
    let mut pos = 0;

    for node in nodes {
        match node {
            SurfaceNode::Mention(m) => match m.valid_meta() {
                Some(meta) => {
                    let length = 1 + char_len(&meta.label);
                    model.segments.push(Segment::Mention {
                        trigger: meta.trigger,
                        label: meta.label.clone(),
                        value: meta.value.clone(),
                        extra: meta.extra.clone(),
                    });
                    model.mentions.push(MentionEntity {
                        value: meta.value.clone(),
                        label: meta.label.clone(),
                        trigger: meta.trigger,
                        start: pos,
                        length,
                        extra: meta.extra.clone(),
                    });
                    model.text.push(meta.trigger);
                    model.text.push_str(&meta.label);
                    pos += length;
                }
                None => {
                    tracing::warn!(display = %m.display, "Mention token lost its metadata, reading as text");
                    push_visible(&mut model, &mut pos, node);
                }
            },
            _ => push_visible(&mut model, &mut pos, node),
        }
    }
    model
}

fn push_visible(model: &mut SurfaceModel, pos: &mut usize, node: &SurfaceNode) {
    let text = node.visible_text();
    if text.is_empty() {
        return;
    }
    *pos += char_len(&text);
    model.text.push_str(&text);
    model.segments.push(Segment::text(text.into_owned()));
}

/// Build the token node for a committed candidate
pub fn mention_node_for(
    item: &MentionItem,
    trigger: char,
    registry: &TriggerRegistry,
    read_only: bool,
) -> MentionNode {
    let meta = MentionMeta {
        trigger,
        label: item.label.clone(),
        value: item.value.clone(),
        extra: item.data.clone(),
    };
    MentionNode::new(meta, registry.appearance(trigger, Some(item), read_only))
}

/// Commit a candidate: replace `<trigger><query>` from `trigger_start` up to
/// the caret with the token plus a single space, caret after the space.
pub fn apply_selection(
    surface: &mut Surface,
    trigger_start: CursorAnchor,
    trigger: char,
    item: &MentionItem,
    registry: &TriggerRegistry,
    read_only: bool,
) -> CursorAnchor {
    let token = mention_node_for(item, trigger, registry, read_only);
    let caret = surface.caret();
    let after = surface.splice(
        trigger_start,
        caret,
        vec![SurfaceNode::Mention(token), SurfaceNode::text(" ")],
    );
    tracing::debug!(target: "surface", label = %item.label, %trigger, "candidate committed");
    after
}
