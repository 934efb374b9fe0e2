//! Invariant verification.

use super::RbTree;
use crate::error::{InvariantViolation, Result};
use crate::node::{Color, NodeId};

impl<K: Ord, V> RbTree<K, V> {
    /// Checks every structural and red-black invariant:
    ///
    /// - keys strictly ascend in order
    /// - the root is black and has no parent
    /// - no red node has a red child
    /// - all paths from a node to its absent children carry the same number
    ///   of black nodes
    /// - every child links back to its parent
    /// - no double-black marker is left behind
    /// - `len` matches the number of reachable nodes
    ///
    /// Runs in `O(n)`. A failure indicates a bug in the tree.
    pub fn check_invariants(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.len != 0 {
                return Err(InvariantViolation::LenMismatch {
                    expected: self.len,
                    found: 0,
                }
                .into());
            }
            return Ok(());
        };

        let root_node = &self.nodes[root];
        if root_node.parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink.into());
        }
        if root_node.color.is_red() {
            return Err(InvariantViolation::RedRoot.into());
        }

        let mut reachable = 0;
        self.check_subtree(root, &mut reachable)?;
        if reachable != self.len {
            return Err(InvariantViolation::LenMismatch {
                expected: self.len,
                found: reachable,
            }
            .into());
        }

        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            if prev.is_some_and(|p| p >= key) {
                return Err(InvariantViolation::OrderViolation.into());
            }
            prev = Some(key);
        }
        Ok(())
    }

    /// Returns the black height of the subtree at `id`, counting `id`.
    fn check_subtree(
        &self,
        id: NodeId,
        reachable: &mut usize,
    ) -> std::result::Result<usize, InvariantViolation> {
        *reachable += 1;
        // More nodes than slots means a link cycle.
        if *reachable > self.nodes.slot_count() {
            return Err(InvariantViolation::LenMismatch {
                expected: self.len,
                found: *reachable,
            });
        }

        let node = &self.nodes[id];
        if node.color == Color::DoubleBlack {
            return Err(InvariantViolation::StrayDoubleBlack);
        }

        let mut heights = [0usize; 2];
        for (height, child) in heights.iter_mut().zip([node.left, node.right]) {
            let Some(child) = child else {
                continue;
            };
            let child_node = &self.nodes[child];
            if child_node.parent != Some(id) {
                return Err(InvariantViolation::BrokenParentLink);
            }
            if node.color.is_red() && child_node.color.is_red() {
                return Err(InvariantViolation::RedRedEdge);
            }
            *height = self.check_subtree(child, reachable)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(!node.color.is_red()))
    }
}
