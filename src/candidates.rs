//! Candidate engine: filters the active trigger's options and owns the highlight.

use std::fmt;
use std::rc::Rc;

use crate::model::MentionItem;
use crate::trigger::TriggerRegistry;

/// Host predicate that replaces the default match test
pub type CandidateFilter = Rc<dyn Fn(&str, &MentionItem) -> bool>;

/// Case-insensitive substring match against the label and the stringified value
pub fn default_match(query: &str, item: &MentionItem) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    item.label.to_lowercase().contains(&q) || item.value.to_string().to_lowercase().contains(&q)
}

/// Filtered candidate list with a highlighted index
#[derive(Clone, Default)]
pub struct CandidateEngine {
    items: Vec<MentionItem>,
    highlighted: Option<usize>,
    filter: Option<CandidateFilter>,
}

impl fmt::Debug for CandidateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateEngine")
            .field("items", &self.items.len())
            .field("highlighted", &self.highlighted)
            .field("custom_filter", &self.filter.is_some())
            .finish()
    }
}

impl CandidateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: CandidateFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn set_filter(&mut self, filter: Option<CandidateFilter>) {
        self.filter = filter;
    }

    /// Matching, enabled candidates for `trigger` in source order
    pub fn filter(&self, query: &str, trigger: char, registry: &TriggerRegistry) -> Vec<MentionItem> {
        let options = registry.options_for(trigger, query);
        options
            .iter()
            .filter(|item| !item.disabled)
            .filter(|item| match &self.filter {
                Some(custom) => (**custom)(query, item),
                None => default_match(query, item),
            })
            .cloned()
            .collect()
    }

    /// Recompute the list for a new query; the highlight goes back to the first item
    pub fn refresh(&mut self, query: &str, trigger: char, registry: &TriggerRegistry) -> &[MentionItem] {
        self.items = self.filter(query, trigger, registry);
        self.highlighted = if self.items.is_empty() { None } else { Some(0) };
        tracing::trace!(query, %trigger, count = self.items.len(), "candidates refreshed");
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.highlighted = None;
    }

    pub fn items(&self) -> &[MentionItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highlighted index, `None` when the list is empty
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&MentionItem> {
        self.highlighted.and_then(|i| self.items.get(i))
    }

    /// Move the highlight down, wrapping to the top
    pub fn next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1) % len));
    }

    /// Move the highlight up, wrapping to the bottom
    pub fn prev(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Pointer hover: highlight without selecting. Out-of-range indices are ignored.
    pub fn hover(&mut self, index: usize) {
        if index < self.items.len() {
            self.highlighted = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerDefaults;

    fn registry() -> TriggerRegistry {
        TriggerRegistry::new(vec!['@']).with_defaults(TriggerDefaults {
            options: vec![
                MentionItem::new(1, "Alice"),
                MentionItem::new(2, "alfred").disabled(),
                MentionItem::new(3, "Bob"),
                MentionItem::new("al-9", "Carol"),
            ],
            ..Default::default()
        })
    }

    fn labels(items: &[MentionItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_default_filter_label_and_value() {
        let engine = CandidateEngine::new();
        let found = engine.filter("AL", '@', &registry());
        assert_eq!(labels(&found), vec!["Alice", "Carol"]);
        assert_eq!(engine.filter("", '@', &registry()).len(), 3);
        assert_eq!(labels(&engine.filter("3", '@', &registry())), vec!["Bob"]);
    }

    #[test]
    fn test_custom_filter_overrides_default() {
        let engine =
            CandidateEngine::new().with_filter(Rc::new(|q: &str, item: &MentionItem| item.label.starts_with(q)));
        assert_eq!(labels(&engine.filter("B", '@', &registry())), vec!["Bob"]);
        assert!(engine.filter("b", '@', &registry()).is_empty());
    }

    #[test]
    fn test_refresh_resets_highlight() {
        let mut engine = CandidateEngine::new();
        engine.refresh("", '@', &registry());
        engine.next();
        assert_eq!(engine.highlighted(), Some(1));
        engine.refresh("a", '@', &registry());
        assert_eq!(engine.highlighted(), Some(0));
        engine.refresh("zzz", '@', &registry());
        assert_eq!(engine.highlighted(), None);
        assert!(engine.highlighted_item().is_none());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut engine = CandidateEngine::new();
        engine.refresh("", '@', &registry());
        engine.prev();
        assert_eq!(engine.highlighted_item().unwrap().label, "Carol");
        engine.next();
        assert_eq!(engine.highlighted(), Some(0));
    }

    #[test]
    fn test_hover_sets_index() {
        let mut engine = CandidateEngine::new();
        engine.refresh("", '@', &registry());
        engine.hover(2);
        assert_eq!(engine.highlighted(), Some(2));
        engine.hover(10);
        assert_eq!(engine.highlighted(), Some(2));
    }
}
