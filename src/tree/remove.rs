//! Deletion and the double-black fixup.

use std::borrow::Borrow;

use tracing::trace;

use super::RbTree;
use crate::error::{Result, TreeError};
use crate::node::{Color, NodeId, Side};

impl<K: Ord, V> RbTree<K, V> {
    /// Removes `key`, returning its value, or `None` if it was not present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(id) = self.find(key) else {
            trace!(len = self.len, "remove of absent key");
            return None;
        };
        Some(self.delete_node(id))
    }

    /// Like [`remove`](Self::remove), but reports an absent key as
    /// [`TreeError::NotFound`].
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).ok_or(TreeError::NotFound)
    }
}

impl<K, V> RbTree<K, V> {
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.extreme(self.root?, Side::Left);
        Some(self.delete_node(id))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.extreme(self.root?, Side::Right);
        Some(self.delete_node(id))
    }

    /// Unlinks the entry stored at `v` and returns it.
    pub(super) fn delete_node(&mut self, mut v: NodeId) -> (K, V) {
        // Structural removal only ever happens at a node with at most one
        // child. A node with two children trades payloads with its in-order
        // successor, which has no left child, and the removal moves there.
        while let (Some(_), Some(right)) = (self.nodes[v].left, self.nodes[v].right) {
            let successor = self.extreme(right, Side::Left);
            self.nodes.swap_payload(v, successor);
            v = successor;
        }

        let node = &self.nodes[v];
        let child = node.left.or(node.right);
        let parent = node.parent;
        let both_black = !node.color.is_red() && !self.is_red(child);

        match (child, parent) {
            (None, None) => self.root = None,
            (None, Some(_)) => {
                // A red leaf goes without a trace; a black one leaves its
                // path one black short, which the fixup repairs while `v` is
                // still in place.
                if both_black {
                    self.set_color(v, Color::DoubleBlack);
                    self.fix_double_black(v);
                }
                // Fixup rotations keep `v` below a parent, but not necessarily the same one.
                if let Some(parent) = self.nodes[v].parent {
                    let side = self.side_of(v, parent);
                    *self.nodes[parent].child_mut(side) = None;
                }
            }
            (Some(u), _) => {
                self.replace_child(parent, v, Some(u));
                self.nodes[u].parent = parent;
                if both_black {
                    self.set_color(u, Color::DoubleBlack);
                    self.fix_double_black(u);
                } else {
                    self.set_color(u, Color::Black);
                }
            }
        }

        self.len -= 1;
        self.blacken_root();
        let node = self.nodes.release(v);
        (node.key, node.value)
    }

    /// Resolves the black deficit carried by the double-black node `x`.
    ///
    /// Each step looks only at `x`'s parent, sibling and the sibling's
    /// children. Every exit leaves `x` black again.
    fn fix_double_black(&mut self, mut x: NodeId) {
        while let Some(parent) = self.nodes[x].parent {
            let side = self.side_of(x, parent);

            let Some(sibling) = self.nodes[parent].child(side.opposite()) else {
                // Nothing to borrow from at this level; hand the deficit up.
                self.set_color(x, Color::Black);
                if self.nodes[parent].color.is_red() {
                    self.set_color(parent, Color::Black);
                    return;
                }
                self.set_color(parent, Color::DoubleBlack);
                x = parent;
                continue;
            };

            if self.nodes[sibling].color.is_red() {
                // Turn a red sibling into a black one and retry at the same node.
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                self.rotate(parent, side);
                continue;
            }

            let near = self.nodes[sibling].child(side);
            let far = self.nodes[sibling].child(side.opposite());
            let red_near = near.filter(|&id| self.nodes[id].color.is_red());
            let red_far = far.filter(|&id| self.nodes[id].color.is_red());
            let parent_color = self.nodes[parent].color;

            match (red_far, red_near) {
                (Some(far), _) => {
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    self.set_color(far, Color::Black);
                    self.rotate(parent, side);
                    self.set_color(x, Color::Black);
                    return;
                }
                (None, Some(near)) => {
                    self.set_color(near, parent_color);
                    self.set_color(parent, Color::Black);
                    self.rotate(sibling, side.opposite());
                    self.rotate(parent, side);
                    self.set_color(x, Color::Black);
                    return;
                }
                (None, None) => {
                    self.set_color(sibling, Color::Red);
                    self.set_color(x, Color::Black);
                    if parent_color.is_red() {
                        self.set_color(parent, Color::Black);
                        return;
                    }
                    self.set_color(parent, Color::DoubleBlack);
                    x = parent;
                }
            }
        }
        // Deficit reached the root: every path lost one black node.
        self.set_color(x, Color::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(keys: &[i32]) -> RbTree<i32, i32> {
        keys.iter().map(|&k| (k, k * 10)).collect()
    }

    fn keys(t: &RbTree<i32, i32>) -> Vec<i32> {
        t.keys().copied().collect()
    }

    #[test]
    fn test_remove() {
        let mut t = tree(&[1, 2, 3]);
        assert_eq!(t.remove(&2), Some(20));
        assert_eq!(t.remove(&2), None);
        assert_eq!(t.get(&2), None);
        assert_eq!(keys(&t), vec![1, 3]);
        assert_eq!(t.len(), 2);
        t.check_invariants().unwrap();
    }

    #[test]
    fn test_scenario_delete() {
        let mut t = tree(&[7, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13]);
        for k in [18, 11, 3, 10, 22] {
            assert_eq!(t.remove(&k), Some(k * 10));
            t.check_invariants().unwrap();
        }
        assert_eq!(keys(&t), vec![2, 6, 7, 8, 13, 26]);
        for k in [18, 11, 3, 10, 22] {
            assert!(!t.contains_key(&k));
        }
        for k in [2, 6, 7, 8, 13, 26] {
            assert_eq!(t.get(&k), Some(&(k * 10)));
        }
    }

    #[test]
    fn test_delete_on_empty_reports_not_found() {
        let mut t: RbTree<i32, i32> = RbTree::new();
        assert_eq!(t.delete(&5), Err(TreeError::NotFound));
        assert!(t.is_empty());
        assert!(t.get(&5).is_none());
    }

    #[test]
    fn test_delete_absent_key_leaves_tree_unchanged() {
        let mut t = tree(&[5, 1, 9]);
        let before = t.clone();
        assert_eq!(t.delete(&4), Err(TreeError::NotFound));
        assert_eq!(t, before);
        assert_eq!(t.delete(&9), Ok(90));
    }

    #[test]
    fn test_remove_root_with_single_child() {
        let mut t = tree(&[1, 2]);
        assert_eq!(t.remove(&1), Some(10));
        assert_eq!(keys(&t), vec![2]);
        t.check_invariants().unwrap();
        assert_eq!(t.remove(&2), Some(20));
        assert!(t.is_empty());
        assert!(t.root.is_none());
        t.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_two_child_node_keeps_successor_payload() {
        let mut t = tree(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(t.remove_entry(&4), Some((4, 40)));
        assert_eq!(t.get(&5), Some(&50));
        assert_eq!(keys(&t), vec![1, 2, 3, 5, 6, 7]);
        t.check_invariants().unwrap();
    }

    #[test]
    fn test_black_leaf_removal_cases() {
        // Each removal of a black leaf exercises a different sibling shape.
        for victim in 0..32 {
            let mut t = tree(&(0..32).collect::<Vec<_>>());
            assert_eq!(t.remove(&victim), Some(victim * 10));
            t.check_invariants().unwrap();
            assert_eq!(t.len(), 31);
        }
    }

    #[test]
    fn test_drain_in_every_direction() {
        let n = 200;
        let mut t = tree(&(0..n).collect::<Vec<_>>());
        for k in 0..n {
            assert!(t.remove(&k).is_some());
            t.check_invariants().unwrap();
        }
        assert!(t.is_empty());

        let mut t = tree(&(0..n).collect::<Vec<_>>());
        for k in (0..n).rev() {
            assert!(t.remove(&k).is_some());
            t.check_invariants().unwrap();
        }
        assert!(t.is_empty());

        let mut t = tree(&(0..n).collect::<Vec<_>>());
        for k in (0..n).filter(|k| k % 2 == 0).chain((0..n).filter(|k| k % 2 == 1)) {
            assert!(t.remove(&k).is_some());
            t.check_invariants().unwrap();
        }
        assert!(t.is_empty());
    }

    #[test]
    fn test_pop_first_last() {
        let mut t = tree(&[3, 1, 4, 5, 9, 2, 6]);
        assert_eq!(t.pop_first(), Some((1, 10)));
        assert_eq!(t.pop_last(), Some((9, 90)));
        assert_eq!(keys(&t), vec![2, 3, 4, 5, 6]);
        t.check_invariants().unwrap();

        let mut empty: RbTree<i32, i32> = RbTree::new();
        assert_eq!(empty.pop_first(), None);
        assert_eq!(empty.pop_last(), None);
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut t = tree(&(0..64).collect::<Vec<_>>());
        let slots = t.nodes.slot_count();
        for k in 0..32 {
            t.remove(&k);
        }
        for k in 100..132 {
            t.insert(k, k);
        }
        assert_eq!(t.nodes.slot_count(), slots);
        t.check_invariants().unwrap();
    }
}
