//! Dirty tracking and cache reuse across layout passes.

use std::cell::Cell;
use std::rc::Rc;

use boxflow_layout::{
    Align, Direction, FlexDirection, LayoutTree, MeasureMode, NodeId, OptionalFloat, Size, Style,
    Value,
};

const UNDEFINED: OptionalFloat = OptionalFloat::UNDEFINED;

/// A text-like leaf that counts its measure calls.
fn counted_leaf(tree: &mut LayoutTree, width: f32, height: f32) -> (NodeId, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let id = tree.new_leaf_with_measure(Style::new(), move |_, available, mode, _, _| {
        counter.set(counter.get() + 1);
        let w = match mode {
            MeasureMode::Undefined => width,
            _ => width.min(available.unwrap_or(width)),
        };
        Size::new(w, height)
    });
    (id, calls)
}

struct Fixture {
    tree: LayoutTree,
    root: NodeId,
    panel: NodeId,
    label: NodeId,
    sibling: NodeId,
    uncle: NodeId,
    label_calls: Rc<Cell<usize>>,
}

/// root (row) -> [panel (column) -> [label, sibling], uncle]
fn fixture() -> Fixture {
    let mut tree = LayoutTree::new();
    let (label, label_calls) = counted_leaf(&mut tree, 80.0, 16.0);
    let (sibling, _) = counted_leaf(&mut tree, 40.0, 16.0);
    let panel = tree
        .new_node_with_children(Style::new().flex_grow(1.0), &[label, sibling])
        .unwrap();
    let uncle = tree.new_node_with_style(Style::new().width(Value::Point(50.0)));
    let root = tree
        .new_node_with_children(
            Style::new()
                .flex_direction(FlexDirection::Row)
                .size(300.0, 200.0),
            &[panel, uncle],
        )
        .unwrap();
    Fixture {
        tree,
        root,
        panel,
        label,
        sibling,
        uncle,
        label_calls,
    }
}

fn run(tree: &mut LayoutTree, root: NodeId) {
    tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr)
        .unwrap();
}

#[test]
fn test_second_pass_makes_no_measure_calls() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    let first = f.tree.cache_stats().measure_calls();
    assert!(first > 0);
    assert!(f.label_calls.get() > 0);
    let label_calls = f.label_calls.get();

    run(&mut f.tree, f.root);
    assert_eq!(f.tree.cache_stats().measure_calls(), first);
    assert_eq!(f.label_calls.get(), label_calls);
}

#[test]
fn test_clean_pass_is_a_root_cache_hit() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    f.tree.reset_cache_stats();
    run(&mut f.tree, f.root);

    let stats = f.tree.cache_stats();
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.misses(), 0);
}

#[test]
fn test_repeated_passes_agree() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    let before: Vec<_> = [f.root, f.panel, f.label, f.sibling, f.uncle]
        .iter()
        .map(|&id| *f.tree.layout(id).unwrap())
        .collect();
    run(&mut f.tree, f.root);
    let after: Vec<_> = [f.root, f.panel, f.label, f.sibling, f.uncle]
        .iter()
        .map(|&id| *f.tree.layout(id).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_layout_clears_dirty_flags() {
    let mut f = fixture();
    for id in [f.root, f.panel, f.label, f.sibling, f.uncle] {
        assert!(f.tree.is_dirty(id).unwrap());
    }
    run(&mut f.tree, f.root);
    for id in [f.root, f.panel, f.label, f.sibling, f.uncle] {
        assert!(!f.tree.is_dirty(id).unwrap());
        assert!(f.tree.layout(id).unwrap().is_computed());
    }
}

#[test]
fn test_dirty_propagates_to_ancestors_only() {
    let mut f = fixture();
    run(&mut f.tree, f.root);

    f.tree.mark_dirty(f.label).unwrap();

    assert!(f.tree.is_dirty(f.label).unwrap());
    assert!(f.tree.is_dirty(f.panel).unwrap());
    assert!(f.tree.is_dirty(f.root).unwrap());
    assert!(!f.tree.is_dirty(f.sibling).unwrap());
    assert!(!f.tree.is_dirty(f.uncle).unwrap());
}

#[test]
fn test_style_change_dirties_ancestors() {
    let mut f = fixture();
    run(&mut f.tree, f.root);

    f.tree.set_height(f.sibling, Value::Point(30.0)).unwrap();

    assert!(f.tree.is_dirty(f.sibling).unwrap());
    assert!(f.tree.is_dirty(f.panel).unwrap());
    assert!(f.tree.is_dirty(f.root).unwrap());
    assert!(!f.tree.is_dirty(f.label).unwrap());
}

#[test]
fn test_dirty_leaf_is_measured_again() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    let calls = f.label_calls.get();

    f.tree.mark_dirty(f.label).unwrap();
    run(&mut f.tree, f.root);

    assert!(f.label_calls.get() > calls);
    assert!(!f.tree.is_dirty(f.root).unwrap());
}

#[test]
fn test_structure_change_relayouts() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    assert_eq!(f.tree.layout(f.panel).unwrap().width, 250.0);

    f.tree.remove_child(f.root, f.uncle).unwrap();
    assert!(f.tree.is_dirty(f.root).unwrap());
    run(&mut f.tree, f.root);
    assert_eq!(f.tree.layout(f.panel).unwrap().width, 300.0);
}

#[test]
fn test_new_layout_flag() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    for id in [f.root, f.label] {
        assert!(f.tree.has_new_layout(id).unwrap());
        f.tree.mark_layout_seen(id).unwrap();
    }

    f.tree.set_width(f.uncle, Value::Point(100.0)).unwrap();
    run(&mut f.tree, f.root);
    assert!(f.tree.has_new_layout(f.root).unwrap());
    assert_eq!(f.tree.layout(f.panel).unwrap().width, 200.0);
}

#[test]
fn test_generation_tracks_recomputed_records() {
    let mut f = fixture();
    run(&mut f.tree, f.root);
    let first = f.tree.layout(f.root).unwrap().generation;
    assert!(first > 0);
    for id in [f.panel, f.label, f.sibling, f.uncle] {
        assert_eq!(f.tree.layout(id).unwrap().generation, first);
    }

    // A clean pass is served from the root's cache.
    run(&mut f.tree, f.root);
    assert_eq!(f.tree.layout(f.root).unwrap().generation, first);

    f.tree.mark_dirty(f.label).unwrap();
    run(&mut f.tree, f.root);
    let latest = f.tree.layout(f.root).unwrap().generation;
    assert!(latest > first);
    assert_eq!(f.tree.layout(f.panel).unwrap().generation, latest);
    assert_eq!(f.tree.layout(f.label).unwrap().generation, latest);
    assert_eq!(f.tree.layout(f.sibling).unwrap().generation, first);
    assert_eq!(f.tree.layout(f.uncle).unwrap().generation, first);
}

#[test]
fn test_owner_size_change_misses_cache() {
    let mut tree = LayoutTree::new();
    let (leaf, calls) = counted_leaf(&mut tree, 500.0, 10.0);
    let root = tree.new_node_with_children(Style::new(), &[leaf]).unwrap();

    tree.calculate_layout(root, 300.0, UNDEFINED, Direction::Ltr)
        .unwrap();
    let first = calls.get();
    assert_eq!(tree.layout(leaf).unwrap().width, 300.0);

    tree.calculate_layout(root, 200.0, UNDEFINED, Direction::Ltr)
        .unwrap();
    assert!(calls.get() > first);
    assert_eq!(tree.layout(leaf).unwrap().width, 200.0);
}

#[test]
fn test_newer_owner_size_replaces_cached_layout() {
    let mut tree = LayoutTree::new();
    let (leaf, calls) = counted_leaf(&mut tree, 500.0, 10.0);
    let root = tree.new_node_with_children(Style::new(), &[leaf]).unwrap();

    tree.calculate_layout(root, 300.0, UNDEFINED, Direction::Ltr)
        .unwrap();
    tree.calculate_layout(root, 200.0, UNDEFINED, Direction::Ltr)
        .unwrap();
    let before = calls.get();

    // Only the latest layout is kept, so going back to 300 lays out again.
    tree.calculate_layout(root, 300.0, UNDEFINED, Direction::Ltr)
        .unwrap();
    assert!(calls.get() > before);
    assert_eq!(tree.layout(leaf).unwrap().width, 300.0);
}

#[test]
fn test_measure_result_does_not_answer_layout() {
    let mut tree = LayoutTree::new();
    let (leaf, calls) = counted_leaf(&mut tree, 80.0, 16.0);
    tree.set_max_width(leaf, Value::Point(300.0)).unwrap();
    tree.set_max_height(leaf, Value::Point(200.0)).unwrap();
    let owner = tree
        .new_node_with_children(
            Style::new()
                .align_items(Align::FlexStart)
                .size(300.0, 200.0),
            &[leaf],
        )
        .unwrap();
    run(&mut tree, owner);

    // The owner measured the leaf at most 300 x 200 for its flex basis; laying
    // the leaf out with those same constraints still calls the measure function.
    let before = calls.get();
    tree.calculate_layout(leaf, UNDEFINED, UNDEFINED, Direction::Ltr)
        .unwrap();
    assert_eq!(calls.get(), before + 1);
    assert_eq!(tree.layout(leaf).unwrap().size(), Size::new(80.0, 16.0));

    // The full layout is cached now.
    tree.calculate_layout(leaf, UNDEFINED, UNDEFINED, Direction::Ltr)
        .unwrap();
    assert_eq!(calls.get(), before + 1);
}

#[test]
fn test_nan_owner_size_is_unbounded() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node_with_style(Style::new().size(30.0, 40.0));
    let root = tree.new_node_with_children(Style::new(), &[child]).unwrap();

    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
        .unwrap();
    assert_eq!(tree.layout(root).unwrap().size(), Size::new(30.0, 40.0));

    tree.calculate_layout(root, f32::INFINITY, UNDEFINED, Direction::Ltr)
        .unwrap();
    assert_eq!(tree.layout(root).unwrap().size(), Size::new(30.0, 40.0));
}

#[test]
fn test_negative_owner_size_is_empty() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node_with_style(Style::new().size(30.0, 40.0));
    let root = tree.new_node_with_children(Style::new(), &[child]).unwrap();

    tree.calculate_layout(root, -50.0, -10.0, Direction::Ltr)
        .unwrap();
    let l = tree.layout(root).unwrap();
    assert_eq!(l.size(), Size::ZERO);
    assert_eq!((l.right, l.bottom), (0.0, 0.0));
}

#[test]
fn test_tracing_subscriber_sees_pass() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
    let mut f = fixture();
    run(&mut f.tree, f.root);
    assert!(f.tree.cache_stats().misses() > 0);
}
