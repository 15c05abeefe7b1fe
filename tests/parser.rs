//! BatchParser tests: email protection, strategies, round trip and idempotence

mod common;

use common::registry;
use mention::model::{plain_text, MentionModel, Segment};
use mention::parser::{parse, BatchParser, ParseStrategy};
use proptest::prelude::*;

fn mentions(segments: &[Segment]) -> Vec<(char, String)> {
    segments
        .iter()
        .filter_map(|s| match s {
            Segment::Mention { trigger, label, .. } => Some((*trigger, label.clone())),
            Segment::Text { .. } => None,
        })
        .collect()
}

// ========================================================================
// Email protection
// ========================================================================

#[test]
fn test_email_address_is_not_a_mention() {
    let segments = parse("contact me at a@b.com", &registry(&['@']), ParseStrategy::Label);
    assert!(mentions(&segments).is_empty());
    assert_eq!(segments, vec![Segment::text("contact me at a@b.com")]);
}

#[test]
fn test_ping_bob() {
    let segments = parse("ping @bob now", &registry(&['@']), ParseStrategy::Label);
    assert_eq!(mentions(&segments), vec![('@', "bob".to_string())]);
    assert_eq!(segments.len(), 3);
}

#[test]
fn test_email_rule_only_applies_to_at() {
    let segments = parse("issue#42", &registry(&['#']), ParseStrategy::Label);
    assert_eq!(mentions(&segments), vec![('#', "42".to_string())]);
}

#[test]
fn test_trigger_after_punctuation_is_a_mention() {
    let segments = parse("(@bob)", &registry(&['@']), ParseStrategy::Label);
    assert_eq!(mentions(&segments), vec![('@', "bob)".to_string())]);
}

// ========================================================================
// Strategies
// ========================================================================

#[test]
fn test_label_strategy_uses_option_value_when_label_matches() {
    let segments = parse("hi @alice and @zed", &registry(&['@']), ParseStrategy::Label);
    let model = MentionModel::from_segments(&segments);
    assert_eq!(model.mentions.len(), 2);
    assert_eq!(model.mentions[0].value.to_string(), "1");
    assert_eq!(model.mentions[1].value.to_string(), "zed");
}

#[test]
fn test_options_strategy_keeps_unknown_runs_as_text() {
    let segments = parse("hi @alice and @zed", &registry(&['@']), ParseStrategy::Options);
    assert_eq!(mentions(&segments), vec![('@', "alice".to_string())]);
    assert_eq!(segments.last(), Some(&Segment::text(" and @zed")));
}

#[test]
fn test_multiple_triggers() {
    let segments = parse("@bob see #alice", &registry(&['@', '#']), ParseStrategy::Label);
    assert_eq!(
        mentions(&segments),
        vec![('@', "bob".to_string()), ('#', "alice".to_string())]
    );
}

#[test]
fn test_no_triggers_is_all_text() {
    let segments = parse("@bob", &registry(&[]), ParseStrategy::Label);
    assert_eq!(segments, vec![Segment::text("@bob")]);
}

#[test]
fn test_parser_reuse() {
    let reg = registry(&['@']);
    let parser = BatchParser::new(&reg, ParseStrategy::Options);
    assert_eq!(parser.strategy(), ParseStrategy::Options);
    assert_eq!(mentions(&parser.parse("@bob")).len(), 1);
    assert_eq!(mentions(&parser.parse("@nobody")).len(), 0);
}

#[test]
fn test_empty_input() {
    assert!(parse("", &registry(&['@']), ParseStrategy::Label).is_empty());
}

// ========================================================================
// Properties
// ========================================================================

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("@".to_string()),
            Just("#".to_string()),
            Just(" ".to_string()),
            Just("\n".to_string()),
            Just(".".to_string()),
            Just("alice".to_string()),
            Just("bob".to_string()),
            Just("x".to_string()),
            Just("é".to_string()),
            Just("日本".to_string()),
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_round_trip(text in text_strategy()) {
        for strategy in [ParseStrategy::Label, ParseStrategy::Options] {
            let segments = parse(&text, &registry(&['@', '#']), strategy);
            prop_assert_eq!(plain_text(&segments), text.clone());
        }
    }

    #[test]
    fn prop_reparse_never_loses_mentions(text in text_strategy()) {
        let reg = registry(&['@', '#']);
        let first = parse(&text, &reg, ParseStrategy::Label);
        let second = parse(&plain_text(&first), &reg, ParseStrategy::Label);
        let before = mentions(&first);
        let after = mentions(&second);
        for m in &before {
            prop_assert!(after.contains(m));
        }
    }

    #[test]
    fn prop_options_reparse_is_stable(text in text_strategy()) {
        let reg = registry(&['@', '#']);
        let first = parse(&text, &reg, ParseStrategy::Options);
        let second = parse(&plain_text(&first), &reg, ParseStrategy::Options);
        prop_assert_eq!(mentions(&first), mentions(&second));
    }

    #[test]
    fn prop_model_is_well_formed(text in text_strategy()) {
        let segments = parse(&text, &registry(&['@', '#']), ParseStrategy::Label);
        let model = MentionModel::from_segments(&segments);
        prop_assert!(model.is_well_formed());
        for pair in model.mentions.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].start + pair[0].length <= pair[1].start);
        }
        prop_assert_eq!(model.to_segments(), segments);
    }
}
