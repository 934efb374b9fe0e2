//! Left/right rotations.

use super::RbTree;
use crate::node::{NodeId, Side};

impl<K, V> RbTree<K, V> {
    /// Rotates `n` down toward `side`, promoting its child on the other side
    /// (the pivot) into `n`'s place. `side == Side::Left` is a left rotation.
    ///
    /// In-order sequence is unchanged. All child and parent links touched by
    /// the rotation are rewritten before returning.
    ///
    /// # Panics
    /// If `n` has no child on the pivot side.
    pub(super) fn rotate(&mut self, n: NodeId, side: Side) {
        let up = side.opposite();
        let Some(pivot) = self.nodes[n].child(up) else {
            panic!("rotation at node {} has no {:?} pivot", n.index(), up);
        };

        let inner = self.nodes[pivot].child(side);
        self.attach(n, up, inner);

        let parent = self.nodes[n].parent;
        self.replace_child(parent, n, Some(pivot));
        self.nodes[pivot].parent = parent;

        self.attach(pivot, side, Some(n));
    }
}
