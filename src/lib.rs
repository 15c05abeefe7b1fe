//! Mention - token parser and caret-trigger engine
//!
//! Turns free-form text into a flat sequence of plain-text and mention
//! segments, detects trigger characters (`@`, `#`, ...) relative to the live
//! caret, and keeps a structured model in sync with an editable surface
//! while the user types, pastes or deletes. Session state changes follow the
//! Elm Architecture: every input is a [`Msg`] applied by [`update::update`].

pub mod candidates;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod events;
pub mod messages;
pub mod model;
pub mod parser;
pub mod scanner;
pub mod session;
pub mod surface;
pub mod sync;
pub mod tracing;
pub mod trigger;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use config::MentionConfig;
pub use events::MentionEvent;
pub use messages::Msg;
pub use model::{MentionEntity, MentionItem, MentionModel, MentionValue, Segment};
pub use parser::{BatchParser, ParseStrategy};
pub use session::MentionSession;
pub use trigger::TriggerRegistry;
