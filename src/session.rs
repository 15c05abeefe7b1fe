//! Editing session: the surface, its structured model, and the trigger lifecycle.
//!
//! ```text
//! CLOSED --scanner finds trigger--> OPEN --query changes--> OPEN
//! OPEN --select | escape | whitespace | caret leaves range--> CLOSED
//! ```
//!
//! `OPEN` shows as [`TriggerState::OpenWithResults`] or
//! [`TriggerState::OpenEmpty`]; both accept the same transitions.

use serde::Serialize;

use crate::candidates::CandidateEngine;
use crate::config::{MentionConfig, ValueFormat};
use crate::events::MentionEvent;
use crate::model::{MentionEntity, MentionItem, MentionModel, Segment};
use crate::parser::BatchParser;
use crate::scanner::{scan_from_caret, TriggerMatch};
use crate::surface::{CursorAnchor, MentionNode, Surface, SurfaceNode};
use crate::sync::{apply_selection, model_from_surface, render_segments, SurfaceModel};
use crate::trigger::TriggerRegistry;

/// An in-progress, not yet committed mention query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    /// Anchor just before the trigger char
    pub start: CursorAnchor,
    pub trigger: char,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Closed,
    OpenWithResults,
    OpenEmpty,
}

/// Structured value in the configured [`ValueFormat`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionValue {
    Model(MentionModel),
    Segments(Vec<Segment>),
    Text(String),
}

/// One mention input
#[derive(Debug, Clone)]
pub struct MentionSession {
    pub config: MentionConfig,
    pub registry: TriggerRegistry,
    pub surface: Surface,
    pub candidates: CandidateEngine,
    pub trigger_ctx: Option<TriggerContext>,
    pub loading: bool,
    pub focused: bool,
    model: SurfaceModel,
}

impl MentionSession {
    pub fn new(config: MentionConfig) -> Self {
        let registry = config.registry();
        Self::with_registry(config, registry)
    }

    /// Build with a prepared registry (e.g. one carrying option providers)
    pub fn with_registry(config: MentionConfig, registry: TriggerRegistry) -> Self {
        let segments = config.initial_segments(&registry);
        let nodes = render_segments(&segments, &registry, config.is_read_only());
        let surface = Surface::from_nodes(nodes);
        let model = model_from_surface(surface.nodes());
        let focused = config.autofocus && !config.disabled;
        tracing::debug!(
            segments = segments.len(),
            triggers = ?registry.triggers(),
            "session created"
        );
        Self {
            config,
            registry,
            surface,
            candidates: CandidateEngine::new(),
            trigger_ctx: None,
            loading: false,
            focused,
            model,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn text(&self) -> &str {
        &self.model.text
    }

    pub fn mentions(&self) -> &[MentionEntity] {
        &self.model.mentions
    }

    pub fn segments(&self) -> &[Segment] {
        &self.model.segments
    }

    pub fn model(&self) -> MentionModel {
        self.model.to_model()
    }

    pub fn value(&self) -> SessionValue {
        match self.config.value_format {
            ValueFormat::Model => SessionValue::Model(self.model()),
            ValueFormat::Segments => SessionValue::Segments(self.model.segments.clone()),
            ValueFormat::Text => SessionValue::Text(self.model.text.clone()),
        }
    }

    pub fn is_editable(&self) -> bool {
        !self.config.is_read_only()
    }

    pub fn trigger_state(&self) -> TriggerState {
        match &self.trigger_ctx {
            None => TriggerState::Closed,
            Some(_) if self.candidates.is_empty() => TriggerState::OpenEmpty,
            Some(_) => TriggerState::OpenWithResults,
        }
    }

    /// Whether a host should show the candidate popup
    pub fn is_popup_visible(&self) -> bool {
        match self.trigger_state() {
            TriggerState::Closed => false,
            TriggerState::OpenWithResults => true,
            TriggerState::OpenEmpty => self.loading,
        }
    }

    /// Placeholder shown while the input is empty
    pub fn placeholder(&self) -> Option<&str> {
        if self.model.text.is_empty() {
            self.config.placeholder.as_deref()
        } else {
            None
        }
    }

    // =========================================================================
    // Host hooks
    // =========================================================================

    /// Call after the surface was mutated: recomputes the model, fires change
    /// events and re-evaluates the trigger
    pub fn on_surface_changed(&mut self) -> Vec<MentionEvent> {
        let mut events = Vec::new();
        self.after_edit(None, &mut events);
        events
    }

    /// Call after the caret moved without an edit. Never opens a new trigger.
    pub fn on_caret_moved(&mut self) -> Vec<MentionEvent> {
        let mut events = Vec::new();
        self.track_caret(&mut events);
        events
    }

    // =========================================================================
    // Internal transitions (driven by `update`)
    // =========================================================================

    /// Model refresh and events after a surface edit, in emission order:
    /// value change, change, remove, then the trigger re-scan
    pub(crate) fn after_edit(&mut self, removed: Option<MentionNode>, events: &mut Vec<MentionEvent>) {
        self.emit_change(events);
        if let Some(meta) = removed.as_ref().and_then(MentionNode::valid_meta) {
            events.push(MentionEvent::Remove {
                value: meta.value.clone(),
                label: meta.label.clone(),
                trigger: meta.trigger,
            });
        }
        self.rescan(events);
    }

    pub(crate) fn emit_change(&mut self, events: &mut Vec<MentionEvent>) {
        self.model = model_from_surface(self.surface.nodes());
        events.push(MentionEvent::ValueChange {
            text: self.model.text.clone(),
            mentions: self.model.mentions.clone(),
            model: self.model.segments.clone(),
        });
        events.push(MentionEvent::Change(self.model.text.clone()));
    }

    /// Re-evaluate the trigger after an edit; may open a new context
    fn rescan(&mut self, events: &mut Vec<MentionEvent>) {
        if !self.is_editable() || !self.surface.is_collapsed() {
            self.close_trigger(events);
            return;
        }
        match scan_from_caret(&self.surface, self.surface.caret(), &self.registry) {
            Some(found) => self.open_or_update(found, events),
            None => self.close_trigger(events),
        }
    }

    /// Keep an open context in sync with the caret; close it when the caret left
    pub(crate) fn track_caret(&mut self, events: &mut Vec<MentionEvent>) {
        let Some((start, trigger)) = self.trigger_ctx.as_ref().map(|c| (c.start, c.trigger)) else {
            return;
        };
        if !self.surface.is_collapsed() {
            self.close_trigger(events);
            return;
        }
        match scan_from_caret(&self.surface, self.surface.caret(), &self.registry) {
            Some(found) if found.range.start == start && found.trigger == trigger => {
                self.open_or_update(found, events)
            }
            _ => self.close_trigger(events),
        }
    }

    fn open_or_update(&mut self, found: TriggerMatch, events: &mut Vec<MentionEvent>) {
        let TriggerMatch {
            trigger,
            query,
            range,
        } = found;
        let was_open = self.trigger_ctx.is_some();
        let same = self
            .trigger_ctx
            .as_ref()
            .is_some_and(|ctx| ctx.start == range.start && ctx.trigger == trigger);

        if same {
            if let Some(ctx) = self.trigger_ctx.as_mut() {
                if ctx.query == query {
                    return;
                }
                ctx.query = query.clone();
            }
        } else {
            tracing::debug!(target: "trigger", %trigger, start = ?range.start, "trigger opened");
            self.trigger_ctx = Some(TriggerContext {
                start: range.start,
                trigger,
                query: query.clone(),
            });
        }

        self.candidates.refresh(&query, trigger, &self.registry);
        events.push(MentionEvent::Search {
            value: query,
            trigger,
        });
        if !was_open {
            events.push(MentionEvent::PopupOpened {
                caret: self.surface.visible_offset(self.surface.caret()),
            });
        }
    }

    pub(crate) fn close_trigger(&mut self, events: &mut Vec<MentionEvent>) {
        if let Some(ctx) = self.trigger_ctx.take() {
            tracing::debug!(target: "trigger", trigger = %ctx.trigger, query = %ctx.query, "trigger closed");
            self.candidates.clear();
            events.push(MentionEvent::PopupClosed);
        }
    }

    /// Commit a candidate into the open trigger range
    pub(crate) fn commit(&mut self, item: MentionItem, events: &mut Vec<MentionEvent>) {
        let Some(ctx) = self.trigger_ctx.clone() else {
            return;
        };
        if item.disabled || !self.is_editable() {
            return;
        }
        apply_selection(
            &mut self.surface,
            ctx.start,
            ctx.trigger,
            &item,
            &self.registry,
            self.config.is_read_only(),
        );
        events.push(MentionEvent::Select {
            value: item,
            trigger: ctx.trigger,
        });
        self.emit_change(events);
        self.close_trigger(events);
    }

    /// Replace all content with rendered segments; the trigger closes
    pub(crate) fn replace_content(&mut self, segments: &[Segment], events: &mut Vec<MentionEvent>) {
        let nodes = render_segments(segments, &self.registry, self.config.is_read_only());
        self.surface.set_nodes(nodes);
        self.emit_change(events);
        self.close_trigger(events);
    }

    /// Bulk-parse `text` into surface nodes with the configured strategy
    pub(crate) fn parse_to_nodes(&self, text: &str) -> Vec<SurfaceNode> {
        let segments = BatchParser::new(&self.registry, self.config.parse_strategy).parse(text);
        render_segments(&segments, &self.registry, self.config.is_read_only())
    }

    /// Re-filter candidates of an open trigger without firing search
    pub(crate) fn refresh_candidates(&mut self) {
        if let Some(ctx) = &self.trigger_ctx {
            self.candidates.refresh(&ctx.query, ctx.trigger, &self.registry);
        }
    }

    /// Check session invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        self.surface.assert_invariants();
        debug_assert_eq!(
            self.model,
            model_from_surface(self.surface.nodes()),
            "cached model out of sync with the surface"
        );
        debug_assert!(
            self.model.to_model().is_well_formed(),
            "model entities must be ordered and non-overlapping"
        );
        if self.trigger_ctx.is_some() {
            debug_assert!(self.surface.is_collapsed(), "open trigger with a range selection");
        } else {
            debug_assert!(self.candidates.is_empty(), "candidates left behind by a closed trigger");
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}
