//! Benchmarks for layout passes.

use boxflow_layout::{
    Direction, FlexDirection, FlexWrap, LayoutTree, NodeId, OptionalFloat, Size, Style, Value,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const UNDEFINED: OptionalFloat = OptionalFloat::UNDEFINED;

fn text_leaf(tree: &mut LayoutTree, chars: usize) -> NodeId {
    tree.new_leaf_with_measure(Style::new(), move |_, width, _, _, _| {
        let natural = chars as f32 * 7.0;
        let w = width.get().map_or(natural, |w| natural.min(w));
        let lines = (natural / w.max(1.0)).ceil().max(1.0);
        Size::new(w, lines * 16.0)
    })
}

fn flat_tree(n: usize) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::new();
    let kids: Vec<NodeId> = (0..n)
        .map(|_| tree.new_node_with_style(Style::new().size(30.0, 30.0)))
        .collect();
    let root = tree
        .new_node_with_children(
            Style::new()
                .flex_direction(FlexDirection::Row)
                .flex_wrap(FlexWrap::Wrap)
                .width(Value::Point(800.0)),
            &kids,
        )
        .expect("fresh nodes");
    (tree, root)
}

fn nested_tree(depth: usize, fanout: usize) -> (LayoutTree, NodeId, NodeId) {
    fn build(tree: &mut LayoutTree, depth: usize, fanout: usize, first_leaf: &mut Option<NodeId>) -> NodeId {
        if depth == 0 {
            let leaf = text_leaf(tree, 24);
            first_leaf.get_or_insert(leaf);
            return leaf;
        }
        let kids: Vec<NodeId> = (0..fanout)
            .map(|_| build(tree, depth - 1, fanout, first_leaf))
            .collect();
        let direction = if depth % 2 == 0 {
            FlexDirection::Row
        } else {
            FlexDirection::Column
        };
        tree.new_node_with_children(
            Style::new().flex_direction(direction).flex_grow(1.0),
            &kids,
        )
        .expect("fresh nodes")
    }

    let mut tree = LayoutTree::new();
    let mut first_leaf = None;
    let root = build(&mut tree, depth, fanout, &mut first_leaf);
    (tree, root, first_leaf.expect("depth produces leaves"))
}

fn bench_flat_100_children(c: &mut Criterion) {
    c.bench_function("layout_flat_100_children", |b| {
        b.iter(|| {
            let (mut tree, root) = flat_tree(100);
            tree.calculate_layout(black_box(root), UNDEFINED, UNDEFINED, Direction::Ltr)
                .expect("live root");
        });
    });
}

fn bench_nested_cold(c: &mut Criterion) {
    c.bench_function("layout_nested_4x4_cold", |b| {
        b.iter(|| {
            let (mut tree, root, _) = nested_tree(4, 4);
            tree.calculate_layout(black_box(root), 1024.0, 768.0, Direction::Ltr)
                .expect("live root");
        });
    });
}

fn bench_nested_clean(c: &mut Criterion) {
    let (mut tree, root, _) = nested_tree(4, 4);
    tree.calculate_layout(root, 1024.0, 768.0, Direction::Ltr)
        .expect("live root");
    c.bench_function("layout_nested_4x4_clean", |b| {
        b.iter(|| {
            tree.calculate_layout(black_box(root), 1024.0, 768.0, Direction::Ltr)
                .expect("live root");
        });
    });
}

fn bench_nested_one_dirty_leaf(c: &mut Criterion) {
    let (mut tree, root, leaf) = nested_tree(4, 4);
    tree.calculate_layout(root, 1024.0, 768.0, Direction::Ltr)
        .expect("live root");
    c.bench_function("layout_nested_4x4_one_dirty_leaf", |b| {
        b.iter(|| {
            tree.mark_dirty(leaf).expect("live leaf");
            tree.calculate_layout(black_box(root), 1024.0, 768.0, Direction::Ltr)
                .expect("live root");
        });
    });
}

criterion_group!(
    benches,
    bench_flat_100_children,
    bench_nested_cold,
    bench_nested_clean,
    bench_nested_one_dirty_leaf,
);
criterion_main!(benches);
