//! Content model: segments, mention entities and candidate items
//!
//! The same content has two lossless views:
//! - [`Segment`] sequence: ordered text runs and mentions
//! - [`MentionModel`]: visible plain text plus [`MentionEntity`] char offsets

pub mod item;
pub mod segment;

pub use item::{options_from_json, MentionItem, MentionValue, TokenType};
pub use segment::{
    model_from_json, plain_text, segments_from_json, MentionEntity, MentionModel, Segment,
};
