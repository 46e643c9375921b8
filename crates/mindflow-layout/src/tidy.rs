//! Tidy tree placement along one axis.
//!
//! Walker's algorithm in the linear-time formulation of Buchheim, Jünger & Leipert, with a
//! variable separation: two neighbours on the same level must be at least
//! `extent(a) + extent(b) + gap` apart. Siblings keep their insertion order, a parent sits midway
//! between its first and last child, and the root is placed at 0.
//!
//! Nodes live in an index arena. Node `0` is the root; children must be pushed in order.

#[derive(Debug, Clone)]
struct TidyNode {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Position among its siblings.
    number: usize,
    /// Half the node's size along the placement axis.
    extent: f64,
    prelim: f64,
    modifier: f64,
    shift: f64,
    change: f64,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor while apportioning this node's children.
    default_ancestor: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TidyTree {
    nodes: Vec<TidyNode>,
}

impl TidyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity + 1),
        }
    }

    /// Adds a node as the last child of `parent` and returns its index.
    pub fn push(&mut self, parent: Option<usize>, extent: f64) -> usize {
        let idx = self.nodes.len();
        let number = match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => {
                p.children.push(idx);
                p.children.len() - 1
            }
            None => 0,
        };
        self.nodes.push(TidyNode {
            parent,
            children: Vec::new(),
            number,
            extent,
            prelim: 0.0,
            modifier: 0.0,
            shift: 0.0,
            change: 0.0,
            thread: None,
            ancestor: idx,
            default_ancestor: None,
        });
        idx
    }

    /// Runs the placement and returns one coordinate per pushed node, indexed like `push`.
    pub fn layout(mut self, gap: f64) -> Vec<f64> {
        let count = self.nodes.len();
        if count == 0 {
            return Vec::new();
        }

        // A virtual parent above the root lets the root go through the same walk as any child.
        let virtual_root = self.push(None, 0.0);
        self.nodes[virtual_root].children.push(0);
        self.nodes[0].parent = Some(virtual_root);

        for v in self.post_order() {
            self.first_walk(v, gap);
        }
        self.nodes[virtual_root].modifier = -self.nodes[0].prelim;

        let mut out = vec![0.0; count];
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            let parent_modifier = self.nodes[v]
                .parent
                .map_or(0.0, |p| self.nodes[p].modifier);
            out[v] = self.nodes[v].prelim + parent_modifier;
            self.nodes[v].modifier += parent_modifier;
            stack.extend(self.nodes[v].children.iter().rev().copied());
        }
        out
    }

    /// Real nodes, children before parents, siblings left to right.
    fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.nodes[v].children.iter().copied());
        }
        order.reverse();
        order
    }

    fn separation(&self, a: usize, b: usize, gap: f64) -> f64 {
        self.nodes[a].extent + self.nodes[b].extent + gap
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .first()
            .copied()
            .or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .last()
            .copied()
            .or(self.nodes[v].thread)
    }

    fn first_walk(&mut self, v: usize, gap: f64) {
        let Some(parent) = self.nodes[v].parent else {
            return;
        };
        let number = self.nodes[v].number;
        let left = number
            .checked_sub(1)
            .map(|i| self.nodes[parent].children[i]);

        let extremes = match (self.nodes[v].children.first(), self.nodes[v].children.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        };
        if let Some((first, last)) = extremes {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match left {
                Some(w) => {
                    let prelim = self.nodes[w].prelim + self.separation(v, w, gap);
                    self.nodes[v].prelim = prelim;
                    self.nodes[v].modifier = prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = left {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w, gap);
        }

        let leftmost = self.nodes[parent].children[0];
        let default_ancestor = self.nodes[parent].default_ancestor.unwrap_or(leftmost);
        let ancestor = self.apportion(v, left, default_ancestor, gap);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, left: Option<usize>, ancestor: usize, gap: f64) -> usize {
        let Some(w) = left else {
            return ancestor;
        };
        let Some(parent) = self.nodes[v].parent else {
            return ancestor;
        };
        let mut ancestor = ancestor;

        // i = inner, o = outer, p = right subtree (v), m = left forest.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let mut next_vim = self.next_right(vim);
        let mut next_vip = self.next_left(vip);
        while let (Some(a), Some(b)) = (next_vim, next_vip) {
            vim = a;
            vip = b;
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip, gap);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;

            next_vim = self.next_right(vim);
            next_vip = self.next_left(vip);
        }

        if let Some(t) = next_vim {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(t);
                self.nodes[vop].modifier += sim - sop;
            }
        }
        if let Some(t) = next_vip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(t);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.nodes[wp]
            .number
            .saturating_sub(self.nodes[wm].number)
            .max(1) as f64;
        let change = shift / subtrees;
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            let node = &mut self.nodes[w];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_has_no_positions() {
        assert!(TidyTree::new().layout(1.0).is_empty());
    }

    #[test]
    fn single_root_sits_at_zero() {
        let mut t = TidyTree::new();
        t.push(None, 20.0);
        assert_eq!(t.layout(28.0), vec![0.0]);
    }

    #[test]
    fn leaves_are_centred_under_the_root() {
        let mut t = TidyTree::new();
        let root = t.push(None, 20.0);
        for _ in 0..3 {
            t.push(Some(root), 20.0);
        }
        assert_eq!(t.layout(28.0), vec![0.0, -68.0, 0.0, 68.0]);
    }

    #[test]
    fn taller_neighbours_are_pushed_further_apart() {
        let mut t = TidyTree::new();
        let root = t.push(None, 20.0);
        t.push(Some(root), 20.0);
        t.push(Some(root), 50.0);
        let pos = t.layout(28.0);
        assert_eq!(pos[2] - pos[1], 20.0 + 50.0 + 28.0);
        assert_eq!(pos[0], 0.0);
    }

    #[test]
    fn cousins_respect_separation() {
        // root -> a -> (a1, a2), b -> (b1, b2): a2 and b1 are neighbours on level 2.
        let mut t = TidyTree::new();
        let root = t.push(None, 10.0);
        let a = t.push(Some(root), 10.0);
        let b = t.push(Some(root), 10.0);
        let a1 = t.push(Some(a), 10.0);
        let a2 = t.push(Some(a), 10.0);
        let b1 = t.push(Some(b), 10.0);
        let b2 = t.push(Some(b), 10.0);
        let pos = t.layout(0.0);

        assert!(pos[b1] - pos[a2] >= 20.0 - 1e-9);
        assert!(pos[a1] < pos[a2] && pos[b1] < pos[b2]);
        assert!((pos[a] - (pos[a1] + pos[a2]) / 2.0).abs() < 1e-9);
        assert!((pos[b] - (pos[b1] + pos[b2]) / 2.0).abs() < 1e-9);
        assert_eq!(pos[root], 0.0);
    }
}
