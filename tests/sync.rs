//! SurfaceSynchronizer tests: render/read inverses, selection commit, deletion

mod common;

use common::{mention_node, registry};
use mention::model::{MentionItem, MentionModel, MentionValue, Segment};
use mention::parser::{parse, ParseStrategy};
use mention::surface::{CursorAnchor, Surface, SurfaceNode};
use mention::sync::{apply_selection, model_from_surface, render_segments};
use proptest::prelude::*;

#[test]
fn test_selection_commit_hi_alice() {
    let reg = registry(&['@']);
    let mut surface = Surface::from_nodes(vec![SurfaceNode::text("Hi @al")]);
    apply_selection(
        &mut surface,
        CursorAnchor::new(0, 3),
        '@',
        &MentionItem::new(1, "alice"),
        &reg,
        false,
    );

    let model = model_from_surface(surface.nodes());
    assert_eq!(model.text, "Hi @alice ");
    assert_eq!(model.mentions.len(), 1);
    let m = &model.mentions[0];
    assert_eq!(m.value, MentionValue::Int(1));
    assert_eq!(m.label, "alice");
    assert_eq!(m.trigger, '@');
    assert_eq!((m.start, m.length), (3, 6));
}

#[test]
fn test_selection_commit_with_query_in_the_middle() {
    let reg = registry(&['@']);
    let mut surface = Surface::from_nodes(vec![SurfaceNode::text("a @bo b")]);
    surface.set_caret(CursorAnchor::new(0, 5));
    let caret = apply_selection(
        &mut surface,
        CursorAnchor::new(0, 2),
        '@',
        &MentionItem::new(2, "bob"),
        &reg,
        false,
    );
    assert_eq!(surface.visible_text(), "a @bob  b");
    assert_eq!(surface.visible_offset(caret), 7);
}

#[test]
fn test_atomic_deletion_hi_alice_there() {
    let mut surface = Surface::from_nodes(vec![
        SurfaceNode::text("Hi "),
        mention_node("alice", 1),
        SurfaceNode::text(" there"),
    ]);
    surface.set_caret(CursorAnchor::new(1, 1));
    let removed = surface.delete_backward();
    assert!(removed.is_some());

    let model = model_from_surface(surface.nodes());
    assert_eq!(
        model.segments,
        vec![Segment::text("Hi "), Segment::text(" there")]
    );
    assert!(model.mentions.is_empty());
}

#[test]
fn test_read_only_render_has_no_closable_tokens() {
    let mut reg = registry(&['@']);
    reg.insert(mention::trigger::TriggerConfig::new('@').with_closable(true));
    let nodes = render_segments(&[Segment::mention('@', "bob", 2)], &reg, true);
    assert!(nodes.iter().filter_map(SurfaceNode::as_mention).all(|m| !m.closable));
}

#[test]
fn test_model_round_trips_through_surface() {
    let reg = registry(&['@', '#']);
    let model = MentionModel {
        text: "see @bob and #carol".into(),
        mentions: vec![],
    };
    let segments = parse(&model.text, &reg, ParseStrategy::Label);
    let read = model_from_surface(&render_segments(&segments, &reg, false));
    assert_eq!(read.text, model.text);
    assert_eq!(read.to_model(), MentionModel::from_segments(&segments));
}

fn segments_strategy() -> impl Strategy<Value = Vec<Segment>> {
    let seg = prop_oneof![
        "[a-z ]{1,6}".prop_map(Segment::text),
        ("[a-z]{1,5}", 0i64..50).prop_map(|(label, v)| Segment::mention('@', label, v)),
    ];
    proptest::collection::vec(seg, 0..10)
}

proptest! {
    #[test]
    fn prop_render_and_read_are_inverses(segments in segments_strategy()) {
        let reg = registry(&['@']);
        let nodes = render_segments(&segments, &reg, false);
        let read = model_from_surface(&nodes);
        prop_assert_eq!(&read.segments, &segments);
        prop_assert_eq!(read.to_model(), MentionModel::from_segments(&segments));
        prop_assert!(read.to_model().is_well_formed());
    }
}
