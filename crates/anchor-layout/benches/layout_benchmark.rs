//! Placement and solving benchmarks.

use anchor_core::{Capabilities, ElementId, Padding, Size};
use anchor_layout::{
    resolve_container_placement, Alignment, Distribution, HorizontalAlignment, Layout,
    LayoutNode, LayoutOptions, LayoutTree, PlacementRequest, Stack, VerticalPosition,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn resolve_placement(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let root = tree.add_root(LayoutNode::new(ElementId(0)));
    let child = tree
        .add_child(root, LayoutNode::new(ElementId(1)))
        .expect("fresh tree");
    let request = PlacementRequest::new(VerticalPosition::Center, HorizontalAlignment::Center)
        .with_padding(Padding::all(8.0))
        .with_size(Size::new(0.0, 44.0));

    c.bench_function("resolve_container_placement", |b| {
        b.iter(|| {
            resolve_container_placement(
                black_box(&tree),
                black_box(child),
                black_box(&request),
                Capabilities::default(),
            )
        })
    });
}

fn solve_stack(c: &mut Criterion) {
    c.bench_function("solve_stack_50", |b| {
        b.iter(|| {
            let mut layout = Layout::new(LayoutOptions::default());
            let root = layout.add_root().expect("root");
            let children: Vec<ElementId> = (0..50)
                .map(|_| {
                    let child = layout.add_element();
                    layout.size(child, Size::new(0.0, 10.0)).expect("size");
                    child
                })
                .collect();
            let stack = Stack::vertical()
                .with_alignment(Alignment::Fill)
                .with_distribution(Distribution::EqualSpacing)
                .with_spacing(2.0);
            layout.arrange(root, &stack, &children).expect("arrange");
            layout.solve();
            black_box(layout.frame(children[49]))
        })
    });
}

criterion_group!(benches, resolve_placement, solve_stack);
criterion_main!(benches);
