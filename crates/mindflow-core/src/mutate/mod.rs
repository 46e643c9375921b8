//! Immutable tree mutations.
//!
//! Every operation borrows the current root and returns a new one. Targets that do not exist,
//! and operations that are forbidden on the root, return a tree equal to the input.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::ids::IdGenerator;
use crate::model::{NEW_NODE_FONT_SIZE, Node, NodeStyle, ROOT_ID, StylePatch};


pub const NEW_CHILD_TEXT: &str = "New Idea";
pub const NEW_SIBLING_TEXT: &str = "New Topic";

fn edit_node(root: &Node, id: &str, op: &'static str, f: impl FnOnce(&mut Node)) -> Node {
    let mut next = root.clone();
    match next.find_mut(id) {
        Some(node) => f(node),
        None => trace!(op, id, "target not found; no-op"),
    }
    next
}

fn taken_ids(root: &Node) -> FxHashSet<String> {
    root.iter().map(|n| n.id.clone()).collect()
}

fn fresh_id(taken: &mut FxHashSet<String>, ids: &mut impl IdGenerator) -> String {
    loop {
        let candidate = ids.next_id();
        if candidate != ROOT_ID && taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}

fn new_node(id: String, text: &str, style: NodeStyle) -> Node {
    Node {
        id,
        text: text.to_string(),
        children: Vec::new(),
        is_expanded: true,
        style: Some(style),
    }
}

pub fn update_text(root: &Node, id: &str, text: &str) -> Node {
    edit_node(root, id, "update_text", |n| n.text = text.to_string())
}

pub fn toggle_expand(root: &Node, id: &str) -> Node {
    edit_node(root, id, "toggle_expand", |n| n.is_expanded = !n.is_expanded)
}

fn patch_style(node: &mut Node, patch: &StylePatch) {
    let base = node.style.take().unwrap_or_default();
    node.style = Some(patch.apply(&base));
}

/// Merges `patch` into one node's style, or into every node's style when `apply_to_all`.
pub fn restyle(root: &Node, id: Option<&str>, patch: &StylePatch, apply_to_all: bool) -> Node {
    if patch.is_empty() {
        trace!("restyle with an empty patch; no-op");
        return root.clone();
    }
    if apply_to_all {
        fn visit(node: &mut Node, patch: &StylePatch) {
            patch_style(node, patch);
            for child in &mut node.children {
                visit(child, patch);
            }
        }
        let mut next = root.clone();
        visit(&mut next, patch);
        return next;
    }
    let Some(id) = id else {
        trace!("restyle without a target; no-op");
        return root.clone();
    };
    edit_node(root, id, "restyle", |n| patch_style(n, patch))
}

/// Appends a "New Idea" child to `parent_id` and expands the parent.
///
/// The child copies the parent's style (or the default style) with the font size reset.
pub fn add_child(root: &Node, parent_id: &str, ids: &mut impl IdGenerator) -> Node {
    let Some(parent) = root.find(parent_id) else {
        trace!(parent_id, "add_child: parent not found; no-op");
        return root.clone();
    };
    let style = NodeStyle {
        font_size: NEW_NODE_FONT_SIZE,
        ..parent.style.clone().unwrap_or_default()
    };
    let id = fresh_id(&mut taken_ids(root), ids);
    let child = new_node(id, NEW_CHILD_TEXT, style);
    edit_node(root, parent_id, "add_child", |p| {
        p.is_expanded = true;
        p.children.push(child);
    })
}

/// Inserts a "New Topic" node right after `after_id` in its parent's children.
pub fn add_sibling(root: &Node, after_id: &str, ids: &mut impl IdGenerator) -> Node {
    if after_id == ROOT_ID {
        trace!("add_sibling: root has no siblings; no-op");
        return root.clone();
    }
    let Some(sibling) = root.find(after_id) else {
        trace!(after_id, "add_sibling: target not found; no-op");
        return root.clone();
    };
    let style = NodeStyle {
        font_size: NEW_NODE_FONT_SIZE,
        ..sibling.style.clone().unwrap_or_default()
    };
    let id = fresh_id(&mut taken_ids(root), ids);

    let mut next = root.clone();
    if let Some(parent) = next.parent_of_mut(after_id) {
        if let Some(pos) = parent.children.iter().position(|c| c.id == after_id) {
            parent
                .children
                .insert(pos + 1, new_node(id, NEW_SIBLING_TEXT, style));
        }
    }
    next
}

/// Removes `id` and its whole subtree, at any depth. The root cannot be deleted.
pub fn delete_node(root: &Node, id: &str) -> Node {
    if id == ROOT_ID {
        trace!("delete_node: root is permanent; no-op");
        return root.clone();
    }
    fn remove(node: &mut Node, id: &str) -> bool {
        if let Some(pos) = node.children.iter().position(|c| c.id == id) {
            node.children.remove(pos);
            return true;
        }
        node.children.iter_mut().any(|c| remove(c, id))
    }
    let mut next = root.clone();
    if !remove(&mut next, id) {
        trace!(id, "delete_node: target not found; no-op");
    }
    next
}

/// Appends one default-styled child per suggestion text and expands the parent.
pub fn graft_suggestions<S: AsRef<str>>(
    root: &Node,
    parent_id: &str,
    texts: &[S],
    ids: &mut impl IdGenerator,
) -> Node {
    if texts.is_empty() || !root.contains(parent_id) {
        trace!(parent_id, count = texts.len(), "graft_suggestions: nothing to merge");
        return root.clone();
    }
    let mut taken = taken_ids(root);
    let children: Vec<Node> = texts
        .iter()
        .map(|t| new_node(fresh_id(&mut taken, ids), t.as_ref(), NodeStyle::default()))
        .collect();
    edit_node(root, parent_id, "graft_suggestions", |p| {
        p.is_expanded = true;
        p.children.extend(children);
    })
}
