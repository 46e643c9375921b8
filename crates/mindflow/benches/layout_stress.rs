use criterion::{Criterion, criterion_group, criterion_main};
use mindflow::{EditSession, LayoutOptions, Node, ROOT_ID, layout_mindmap};
use std::hint::black_box;

/// `fanout`-ary tree of the given depth with labels of varying length.
fn balanced_tree(fanout: usize, depth: usize) -> Node {
    fn build(id: String, fanout: usize, depth: usize) -> Node {
        let text = format!("Topic {id} {}", "x".repeat(id.len() % 17));
        let mut node = Node::new(id.clone(), text);
        if depth > 0 {
            for i in 0..fanout {
                node = node.with_child(build(format!("{id}.{i}"), fanout, depth - 1));
            }
        }
        node
    }
    let mut root = build(ROOT_ID.to_string(), fanout, depth);
    root.text = "Central Idea".to_string();
    root
}

fn bench_layout_stress(c: &mut Criterion) {
    let options = LayoutOptions::default();
    let tree = balanced_tree(4, 5);

    let mut group = c.benchmark_group("layout_stress");
    group.sample_size(50);

    group.bench_function("balanced_tree_layout", |b| {
        b.iter(|| {
            let layout = layout_mindmap(black_box(&tree), &options);
            black_box(layout.nodes.len() ^ layout.edges.len());
        });
    });

    // Each iteration edits then relayouts, like a keystroke in the editor.
    group.bench_function("edit_then_layout_x20", |b| {
        b.iter(|| {
            let mut session = EditSession::new(tree.clone());
            session.select(ROOT_ID);
            let mut acc = 0usize;
            for _ in 0..20usize {
                session.add_child();
                acc ^= session.layout().nodes.len();
            }
            black_box(acc);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_layout_stress);
criterion_main!(benches);
