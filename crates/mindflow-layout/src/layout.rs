use std::collections::VecDeque;

use mindflow_core::Node;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::LayoutOptions;
use crate::estimate::Dimensions;
use crate::model::{LayoutEdge, LayoutNode, MindmapLayout};
use crate::tidy::TidyTree;

struct Visible<'a> {
    node: &'a Node,
    depth: usize,
    parent: Option<usize>,
}

/// Collapsed nodes keep their place but hide their subtree.
fn visible_breadth_first(root: &Node) -> Vec<Visible<'_>> {
    let mut out = vec![Visible {
        node: root,
        depth: 0,
        parent: None,
    }];
    let mut queue = VecDeque::from([0usize]);
    while let Some(idx) = queue.pop_front() {
        let (node, depth) = (out[idx].node, out[idx].depth);
        if !node.is_expanded {
            continue;
        }
        for child in &node.children {
            queue.push_back(out.len());
            out.push(Visible {
                node: child,
                depth: depth + 1,
                parent: Some(idx),
            });
        }
    }
    out
}

fn column_offsets(widths: &[f64], fallback: f64, gap: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(widths.len());
    let mut x = 0.0;
    for &w in widths {
        offsets.push(x);
        let w = if w > 0.0 { w } else { fallback };
        x += w + gap;
    }
    offsets
}

/// Lays out the visible part of `root` left to right, one column per depth.
pub fn layout_mindmap(root: &Node, options: &LayoutOptions) -> MindmapLayout {
    let cfg = &options.config;

    let dims: FxHashMap<&str, Dimensions> = root
        .iter()
        .map(|n| (n.id.as_str(), options.measurer.measure_node(n)))
        .collect();
    let size_of = |n: &Node| dims.get(n.id.as_str()).copied().unwrap_or_default();

    let visible = visible_breadth_first(root);

    // Pushed in breadth-first order, so tidy indices match output indices.
    let mut tidy = TidyTree::with_capacity(visible.len());
    for v in &visible {
        tidy.push(v.parent, size_of(v.node).height / 2.0);
    }
    let ys = tidy.layout(cfg.sibling_gap);

    let depth_count = visible.last().map_or(0, |v| v.depth + 1);
    let mut widths = vec![f64::NAN; depth_count];
    for v in &visible {
        // `f64::max` ignores NaN, so the first real width replaces the seed.
        widths[v.depth] = widths[v.depth].max(size_of(v.node).width);
    }
    let offsets = column_offsets(&widths, cfg.fallback_column_width, cfg.column_gap);

    let nodes: Vec<LayoutNode> = visible
        .iter()
        .zip(&ys)
        .map(|(v, &y)| {
            let d = size_of(v.node);
            LayoutNode {
                id: v.node.id.clone(),
                x: offsets[v.depth],
                y,
                width: d.width,
                height: d.height,
                depth: v.depth,
                parent: v.parent,
            }
        })
        .collect();

    let edges: Vec<LayoutEdge> = nodes
        .iter()
        .enumerate()
        .filter_map(|(target, n)| n.parent.map(|source| LayoutEdge::connect(&nodes, source, target)))
        .collect();

    trace!(
        total = dims.len(),
        visible = nodes.len(),
        depths = depth_count,
        "mindmap layout pass"
    );

    MindmapLayout { nodes, edges }
}
