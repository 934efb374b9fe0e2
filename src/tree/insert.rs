//! Insertion and the red-red fixup.

use std::cmp::Ordering;

use tracing::trace;

use super::RbTree;
use crate::node::{Color, Node, NodeId, Side};

impl<K: Ord, V> RbTree<K, V> {
    /// Inserts `key` with `value`.
    ///
    /// Returns `false` when `key` is already present. In that case nothing
    /// changes: the stored value is kept and `value` is dropped. Use
    /// [`get_mut`](Self::get_mut) to update an existing entry.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    trace!(len = self.len, "insert of present key ignored");
                    return false;
                }
            };
            parent = Some(id);
            cur = node.child(side);
        }

        let id = self.nodes.alloc(Node::new(key, value, parent));
        match parent {
            Some(p) => *self.nodes[p].child_mut(side) = Some(id),
            None => self.root = Some(id),
        }
        self.len += 1;
        self.fix_insert(id);
        true
    }
}

impl<K, V> RbTree<K, V> {
    /// Walks up from the red node `n` until no red node has a red parent,
    /// then blackens the root.
    pub(super) fn fix_insert(&mut self, mut n: NodeId) {
        while let Some(parent) = self.nodes[n].parent {
            if !self.nodes[parent].color.is_red() {
                break;
            }
            // The root is black, so a red parent always has a parent.
            let Some(grand) = self.nodes[parent].parent else {
                break;
            };
            let parent_side = self.side_of(parent, grand);
            let uncle = self.nodes[grand].child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.nodes[u].color.is_red()) {
                // Pure recolor; the red pair moves up two levels.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                n = grand;
                continue;
            }

            // Inner grandchild: straighten into a line first.
            let mut top = parent;
            if self.side_of(n, parent) != parent_side {
                self.rotate(parent, parent_side);
                top = n;
            }
            self.rotate(grand, parent_side.opposite());
            self.set_color(top, Color::Black);
            self.set_color(grand, Color::Red);
            break;
        }
        self.blacken_root();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(t: &RbTree<i32, ()>) -> Vec<(i32, bool)> {
        t.level_order()
            .map(|(k, _)| {
                let id = t.search(k).unwrap();
                (*k, t.nodes[id].color.is_red())
            })
            .collect()
    }

    #[test]
    fn test_first_insert_is_black_root() {
        let mut t: RbTree<i32, ()> = RbTree::new();
        t.insert(10, ());
        assert_eq!(colors(&t), vec![(10, false)]);
    }

    #[test]
    fn test_red_uncle_recolors() {
        let mut t: RbTree<i32, ()> = RbTree::new();
        for k in [10, 5, 15] {
            t.insert(k, ());
        }
        assert_eq!(colors(&t), vec![(10, false), (5, true), (15, true)]);

        // Red parent and red uncle: both turn black, grandparent (root) stays black.
        t.insert(1, ());
        assert_eq!(colors(&t), vec![(10, false), (5, false), (15, false), (1, true)]);
        t.check_invariants().unwrap();
    }

    #[test]
    fn test_straight_line_rotates_grandparent() {
        let mut t: RbTree<i32, ()> = RbTree::new();
        for k in [1, 2, 3] {
            t.insert(k, ());
        }
        assert_eq!(colors(&t), vec![(2, false), (1, true), (3, true)]);
    }

    #[test]
    fn test_inner_child_double_rotation() {
        let mut t: RbTree<i32, ()> = RbTree::new();
        for k in [3, 1, 2] {
            t.insert(k, ());
        }
        assert_eq!(colors(&t), vec![(2, false), (1, true), (3, true)]);

        let mut t: RbTree<i32, ()> = RbTree::new();
        for k in [1, 3, 2] {
            t.insert(k, ());
        }
        assert_eq!(colors(&t), vec![(2, false), (1, true), (3, true)]);
    }

    #[test]
    fn test_scenario_shape() {
        let mut t: RbTree<i32, ()> = RbTree::new();
        for k in [7, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13] {
            t.insert(k, ());
            t.check_invariants().unwrap();
        }
        assert_eq!(
            colors(&t),
            vec![
                (10, false),
                (7, true),
                (18, true),
                (3, false),
                (8, false),
                (11, false),
                (22, false),
                (2, true),
                (6, true),
                (13, true),
                (26, true),
            ]
        );
    }
}
