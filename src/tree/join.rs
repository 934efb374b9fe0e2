//! Merging whole trees and arena compaction.

use std::cmp::Ordering;

use tracing::trace;

use super::RbTree;
use crate::node::{Node, NodeArena, NodeId, Side};

impl<K: Ord, V> RbTree<K, V> {
    /// Moves every entry of `other` into `self`.
    ///
    /// When all keys of one tree precede all keys of the other, the trees are
    /// joined around a single pivot entry at the height where their black
    /// heights meet, which costs `O(log n)` restructuring plus moving
    /// `other`'s nodes into this arena. Overlapping key ranges fall back to
    /// inserting each entry; keys already present keep their current value.
    pub fn merge(&mut self, other: Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }

        let precedes = |low: &Self, high: &Self| match (low.last_key_value(), high.first_key_value()) {
            (Some((last, _)), Some((first, _))) => last < first,
            _ => false,
        };

        if precedes(self, &other) {
            trace!(left = self.len, right = other.len, "joining trees, other above");
            let low = std::mem::take(self);
            *self = Self::join(low, other);
        } else if precedes(&other, self) {
            trace!(left = other.len, right = self.len, "joining trees, other below");
            let high = std::mem::take(self);
            *self = Self::join(other, high);
        } else {
            trace!(len = self.len, incoming = other.len, "key ranges overlap, merging by insertion");
            self.extend(other);
        }
    }
}

impl<K, V> RbTree<K, V> {
    /// Joins `low` and `high`, where every key of `low` is smaller than every
    /// key of `high`. The smallest entry of `high` becomes the pivot.
    fn join(mut low: Self, mut high: Self) -> Self {
        let Some((key, value)) = high.pop_first() else {
            return low;
        };
        let low_height = low.black_height();
        let high_height = high.black_height();
        let len = low.len + high.len + 1;

        let low_root = low.root;
        let high_root = low.adopt(high);
        let pivot = low.nodes.alloc(Node::new(key, value, None));
        low.len = len;

        match low_height.cmp(&high_height) {
            Ordering::Equal => {
                low.root = Some(pivot);
                low.attach(pivot, Side::Left, low_root);
                low.attach(pivot, Side::Right, high_root);
            }
            // Descend the taller tree's facing spine.
            Ordering::Greater => {
                low.splice_pivot(pivot, low_root, high_root, low_height, high_height, Side::Right)
            }
            Ordering::Less => {
                low.splice_pivot(pivot, high_root, low_root, high_height, low_height, Side::Left)
            }
        }
        low.fix_insert(pivot);
        low
    }

    /// Hangs the red `pivot` on the `spine` side of the taller tree, at the
    /// first black (or absent) node whose black height equals `target`. That
    /// node becomes the pivot's inner child and `short_root` its outer child.
    fn splice_pivot(
        &mut self,
        pivot: NodeId,
        tall_root: Option<NodeId>,
        short_root: Option<NodeId>,
        mut height: usize,
        target: usize,
        spine: Side,
    ) {
        self.root = tall_root;
        let mut parent = None;
        let mut cur = tall_root;
        loop {
            let red = self.is_red(cur);
            if !red && height == target {
                break;
            }
            let Some(id) = cur else {
                break;
            };
            if !red {
                height -= 1;
            }
            parent = Some(id);
            cur = self.nodes[id].child(spine);
        }

        self.attach(pivot, spine.opposite(), cur);
        self.attach(pivot, spine, short_root);
        match parent {
            Some(p) => self.attach(p, spine, Some(pivot)),
            None => {
                self.nodes[pivot].parent = None;
                self.root = Some(pivot);
            }
        }
    }

    /// Moves all nodes of `other` into this arena and returns where `other`'s
    /// root ended up. The caller links the returned subtree and fixes `len`.
    fn adopt(&mut self, other: Self) -> Option<NodeId> {
        let RbTree { nodes, root, len } = other;
        let mut remap: Vec<Option<NodeId>> = vec![None; nodes.slot_count()];
        let mut moved = Vec::with_capacity(len);
        for (old, node) in nodes.into_live() {
            let new = self.nodes.alloc(node);
            remap[old.index()] = Some(new);
            moved.push(new);
        }

        let relink = |id: Option<NodeId>| id.and_then(|old| remap[old.index()]);
        for id in moved {
            let node = &mut self.nodes[id];
            node.parent = relink(node.parent);
            node.left = relink(node.left);
            node.right = relink(node.right);
        }
        relink(root)
    }

    /// Rebuilds the arena without vacant slots. Returns the number of slots
    /// reclaimed.
    pub fn compact(&mut self) -> usize {
        let reclaimed = self.nodes.vacant_count();
        if reclaimed == 0 {
            return 0;
        }
        let old = std::mem::take(self);
        let len = old.len;
        self.nodes = NodeArena::with_capacity(len);
        self.root = self.adopt(old);
        self.len = len;
        trace!(reclaimed, len, "compacted node arena");
        reclaimed
    }
}
