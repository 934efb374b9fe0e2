//! Red-black tree core: storage, lookup and the shared helpers used by the
//! rotation, insertion, deletion and join passes.

mod insert;
mod join;
mod remove;
mod rotate;
mod verify;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::iter::{InOrder, Keys, LevelOrder, PreOrder, Values};
use crate::node::{Color, NodeArena, NodeId, Side};

/// An ordered map backed by a red-black tree.
///
/// Nodes live in an index arena; `insert`, `remove` and lookups are
/// `O(log n)` in the worst case. Inserting a key that is already present is a
/// no-op, so the tree never holds duplicates.
pub struct RbTree<K, V> {
    pub(crate) nodes: NodeArena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
}

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before the arena
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Smallest entry.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let root = self.root?;
        Some(self.entry(self.extreme(root, Side::Left)))
    }

    /// Largest entry.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let root = self.root?;
        Some(self.entry(self.extreme(root, Side::Right)))
    }

    /// Number of black nodes on the leftmost root-to-leaf path, root
    /// included. Every other path has the same count.
    pub fn black_height(&self) -> usize {
        let mut height = 0;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            if !node.color.is_red() {
                height += 1;
            }
            cur = node.left;
        }
        height
    }

    /// Bytes reserved by the tree, including vacant arena slots.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.nodes.capacity()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> InOrder<'_, K, V> {
        InOrder::new(self)
    }

    /// Same as [`iter`](Self::iter).
    pub fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder::new(self)
    }

    /// Entries in node-left-right order, starting at the root.
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder::new(self)
    }

    /// Entries level by level from the root, left to right within a level.
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        LevelOrder::new(self)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    // -------------------------------------------------------------------------
    // Structural helpers
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.nodes[id];
        (&node.key, &node.value)
    }

    /// Absent nodes are black.
    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes[id].color.is_red())
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id].color = color;
    }

    fn blacken_root(&mut self) {
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Which slot of `parent` holds `child`.
    #[inline]
    fn side_of(&self, child: NodeId, parent: NodeId) -> Side {
        let node = &self.nodes[parent];
        if node.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(node.right, Some(child), "node is not a child of its parent");
            Side::Right
        }
    }

    /// Repoints the link that referenced `old` (a child slot of `parent`, or
    /// the root) at `new`. The back-link of `new` is left to the caller.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            Some(p) => {
                let side = self.side_of(old, p);
                *self.nodes[p].child_mut(side) = new;
            }
            None => self.root = new,
        }
    }

    /// Sets `parent`'s `side` slot to `child` and `child`'s back-link to
    /// `parent`.
    fn attach(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self.nodes[parent].child_mut(side) = child;
        if let Some(child) = child {
            self.nodes[child].parent = Some(parent);
        }
    }

    /// Follows `side` links from `id` until there are none.
    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(next) = self.nodes[id].child(side) {
            id = next;
        }
        id
    }
}

impl<K: Ord, V> RbTree<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.entry(id))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// The entry for `key` if present, otherwise the last entry visited while
    /// descending toward where `key` would be. Compare the returned key to
    /// tell the two apart. `None` only for an empty tree.
    pub fn nearest<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).map(|id| self.entry(id))
    }

    /// Iterative descent that stops on an exact match or at the last node
    /// before an absent child.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root?;
        loop {
            let node = &self.nodes[cur];
            let next = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(cur),
            };
            match next {
                Some(id) => cur = id,
                None => return Some(cur),
            }
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).filter(|&id| {
            let stored: &Q = self.nodes[id].key.borrow();
            stored == key
        })
    }
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for RbTree<K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RbTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RbTree<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for RbTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
