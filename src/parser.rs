//! Batch parser: raw text to segments in one left-to-right pass.
//!
//! Used for initial load, paste and explicit reparse. Every
//! `<trigger><run of non-whitespace>` is a candidate mention; the email
//! heuristic and the parse strategy decide which candidates survive.
//! Whatever is rejected stays plain text, so the output always
//! concatenates back to the input verbatim.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{MentionValue, Segment};
use crate::trigger::TriggerRegistry;
use crate::util::looks_like_email;

/// How a `<trigger><run>` match becomes a mention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    /// Every match becomes a mention labelled with the run
    #[default]
    Label,
    /// Only runs equal to a candidate label become mentions
    Options,
}

/// Parser bound to a registry and strategy; compiles the trigger pattern once
#[derive(Debug)]
pub struct BatchParser<'a> {
    registry: &'a TriggerRegistry,
    strategy: ParseStrategy,
    pattern: Option<Regex>,
}

impl<'a> BatchParser<'a> {
    pub fn new(registry: &'a TriggerRegistry, strategy: ParseStrategy) -> Self {
        Self {
            registry,
            strategy,
            pattern: trigger_pattern(registry.triggers()),
        }
    }

    pub fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    /// Split `raw` into text and mention segments. Adjacent text is merged.
    pub fn parse(&self, raw: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let Some(pattern) = &self.pattern else {
            push_text(&mut segments, raw);
            return segments;
        };

        let mut last = 0;
        for caps in pattern.captures_iter(raw) {
            let (Some(whole), Some(trig), Some(run)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            push_text(&mut segments, &raw[last..whole.start()]);
            last = whole.end();

            let Some(trigger) = trig.as_str().chars().next() else {
                push_text(&mut segments, whole.as_str());
                continue;
            };
            let label = run.as_str();

            if trigger == '@' {
                let prev = raw[..whole.start()].chars().next_back();
                let next = label.chars().next();
                if looks_like_email(prev, next) {
                    tracing::trace!(target: "parser", text = whole.as_str(), "email protected");
                    push_text(&mut segments, whole.as_str());
                    continue;
                }
            }

            match self.resolve(trigger, label) {
                Some(segment) => segments.push(segment),
                None => push_text(&mut segments, whole.as_str()),
            }
        }
        push_text(&mut segments, &raw[last..]);

        tracing::debug!(
            target: "parser",
            strategy = ?self.strategy,
            segments = segments.len(),
            mentions = segments.iter().filter(|s| s.is_mention()).count(),
            "parsed"
        );
        segments
    }

    fn resolve(&self, trigger: char, label: &str) -> Option<Segment> {
        let options = self.registry.options_for(trigger, label);
        let hit = options.iter().find(|o| o.label == label);
        match (self.strategy, hit) {
            (_, Some(item)) => Some(Segment::Mention {
                trigger,
                label: item.label.clone(),
                value: item.value.clone(),
                extra: item.data.clone(),
            }),
            (ParseStrategy::Label, None) => Some(Segment::Mention {
                trigger,
                label: label.to_string(),
                value: MentionValue::Text(label.to_string()),
                extra: None,
            }),
            (ParseStrategy::Options, None) => None,
        }
    }
}

/// Convenience wrapper for a one-off parse
pub fn parse(raw: &str, registry: &TriggerRegistry, strategy: ParseStrategy) -> Vec<Segment> {
    BatchParser::new(registry, strategy).parse(raw)
}

/// `([<triggers>])(\S+)`, or `None` when there are no triggers
fn trigger_pattern(triggers: &[char]) -> Option<Regex> {
    if triggers.is_empty() {
        return None;
    }
    let class: String = triggers
        .iter()
        .map(|ch| regex::escape(&ch.to_string()))
        .collect();
    match Regex::new(&format!(r"([{}])(\S+)", class)) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Could not build trigger pattern for {:?}: {}", triggers, e);
            None
        }
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text { text: prev }) = segments.last_mut() {
        prev.push_str(text);
    } else {
        segments.push(Segment::text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{plain_text, MentionItem};
    use crate::trigger::{TriggerConfig, TriggerDefaults};

    fn registry() -> TriggerRegistry {
        TriggerRegistry::new(vec!['@', '#']).with_defaults(TriggerDefaults {
            options: vec![MentionItem::new(1, "alice"), MentionItem::new(2, "bob")],
            ..Default::default()
        })
    }

    #[test]
    fn test_label_strategy_single_mention() {
        let segs = parse("ping @bob now", &registry(), ParseStrategy::Label);
        assert_eq!(
            segs,
            vec![
                Segment::text("ping "),
                Segment::mention('@', "bob", 2),
                Segment::text(" now"),
            ]
        );
    }

    #[test]
    fn test_label_strategy_unknown_label_uses_label_as_value() {
        let segs = parse("@carol", &registry(), ParseStrategy::Label);
        assert_eq!(segs, vec![Segment::mention('@', "carol", "carol")]);
    }

    #[test]
    fn test_email_is_not_a_mention() {
        let segs = parse("contact me at a@b.com", &registry(), ParseStrategy::Label);
        assert_eq!(segs, vec![Segment::text("contact me at a@b.com")]);
    }

    #[test]
    fn test_email_protection_only_applies_to_at() {
        let segs = parse("issue#12", &registry(), ParseStrategy::Label);
        assert_eq!(
            segs,
            vec![Segment::text("issue"), Segment::mention('#', "12", "12")]
        );
    }

    #[test]
    fn test_options_strategy_requires_exact_label() {
        let segs = parse("@alice @al @bob", &registry(), ParseStrategy::Options);
        assert_eq!(
            segs,
            vec![
                Segment::mention('@', "alice", 1),
                Segment::text(" @al "),
                Segment::mention('@', "bob", 2),
            ]
        );
    }

    #[test]
    fn test_options_strategy_uses_trigger_options() {
        let reg = registry().with_config(
            TriggerConfig::new('#').with_options(vec![MentionItem::new("t1", "rust")]),
        );
        let segs = parse("#rust #alice", &reg, ParseStrategy::Options);
        assert_eq!(
            segs,
            vec![Segment::mention('#', "rust", "t1"), Segment::text(" #alice")]
        );
    }

    #[test]
    fn test_no_triggers_yields_text() {
        let reg = TriggerRegistry::new(vec![]);
        assert_eq!(
            parse("@bob", &reg, ParseStrategy::Label),
            vec![Segment::text("@bob")]
        );
        assert!(parse("", &reg, ParseStrategy::Label).is_empty());
    }

    #[test]
    fn test_regex_metachar_trigger() {
        let reg = TriggerRegistry::new(vec!['^', '-']);
        let segs = parse("a ^up -down", &reg, ParseStrategy::Label);
        assert_eq!(
            segs,
            vec![
                Segment::text("a "),
                Segment::mention('^', "up", "up"),
                Segment::text(" "),
                Segment::mention('-', "down", "down"),
            ]
        );
    }

    #[test]
    fn test_round_trip_with_multibyte_text() {
        let raw = "你好 @张三 和 #话题，a@b.cn";
        let segs = parse(raw, &registry(), ParseStrategy::Label);
        assert_eq!(plain_text(&segs), raw);
    }
}
