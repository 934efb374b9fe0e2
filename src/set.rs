//! Ordered set facade over [`RbTree`].

use std::borrow::Borrow;
use std::fmt;

use crate::error::Result;
use crate::iter::{self, InOrder, LevelOrder, PreOrder};
use crate::tree::RbTree;

/// An ordered set of unique keys backed by a red-black tree.
pub struct RbSet<K> {
    tree: RbTree<K, ()>,
}

impl<K> RbSet<K> {
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RbTree::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn first(&self) -> Option<&K> {
        self.tree.first_key_value().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&K> {
        self.tree.last_key_value().map(|(k, _)| k)
    }

    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first().map(|(k, _)| k)
    }

    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last().map(|(k, _)| k)
    }

    pub fn black_height(&self) -> usize {
        self.tree.black_height()
    }

    pub fn iter(&self) -> SetIter<InOrder<'_, K, ()>> {
        SetIter(self.tree.in_order())
    }

    pub fn in_order(&self) -> SetIter<InOrder<'_, K, ()>> {
        SetIter(self.tree.in_order())
    }

    pub fn pre_order(&self) -> SetIter<PreOrder<'_, K, ()>> {
        SetIter(self.tree.pre_order())
    }

    pub fn level_order(&self) -> SetIter<LevelOrder<'_, K, ()>> {
        SetIter(self.tree.level_order())
    }

    pub fn compact(&mut self) -> usize {
        self.tree.compact()
    }
}

impl<K: Ord> RbSet<K> {
    /// Adds `key`. Returns `false`, leaving the set unchanged, if it was
    /// already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.tree.insert(key, ())
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// The stored key equal to `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_key_value(key).map(|(k, _)| k)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).is_some()
    }

    /// Removes `key`, reporting [`TreeError::NotFound`](crate::TreeError::NotFound)
    /// if it was absent.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.delete(key)
    }

    pub fn merge(&mut self, other: Self) {
        self.tree.merge(other.tree);
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.tree.check_invariants()
    }
}

impl<K> Default for RbSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for RbSet<K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq> PartialEq for RbSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq> Eq for RbSet<K> {}

impl<K: fmt::Debug> fmt::Debug for RbSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RbSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for RbSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> IntoIterator for RbSet<K> {
    type Item = K;
    type IntoIter = std::iter::Map<iter::IntoIter<K, ()>, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter().map(key_only as fn((K, ())) -> K)
    }
}

impl<'a, K> IntoIterator for &'a RbSet<K> {
    type Item = &'a K;
    type IntoIter = SetIter<InOrder<'a, K, ()>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn key_only<K>((key, ()): (K, ())) -> K {
    key
}

/// Adapts any map traversal to yield keys only.
#[derive(Clone)]
pub struct SetIter<I>(I);

impl<'a, K: 'a, I> Iterator for SetIter<I>
where
    I: Iterator<Item = (&'a K, &'a ())>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeError;

    #[test]
    fn test_set_basics() {
        let mut s: RbSet<u32> = RbSet::new();
        assert!(s.insert(5));
        assert!(s.insert(1));
        assert!(!s.insert(5));
        assert_eq!(s.len(), 2);
        assert!(s.contains(&1));
        assert_eq!(s.get(&5), Some(&5));
        assert!(s.remove(&1));
        assert!(!s.remove(&1));
        assert_eq!(s.delete(&1), Err(TreeError::NotFound));
        assert_eq!(s.delete(&5), Ok(()));
        assert!(s.is_empty());
        s.check_invariants().unwrap();
    }

    #[test]
    fn test_set_traversals() {
        let s: RbSet<i32> = [7, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13].into_iter().collect();
        assert_eq!(
            s.iter().copied().collect::<Vec<_>>(),
            vec![2, 3, 6, 7, 8, 10, 11, 13, 18, 22, 26]
        );
        assert_eq!(s.level_order().next(), Some(&10));
        assert_eq!(s.pre_order().count(), 11);
        assert_eq!(s.first(), Some(&2));
        assert_eq!(s.last(), Some(&26));
        assert_eq!(format!("{:?}", s.iter().take(3).collect::<Vec<_>>()), "[2, 3, 6]");
    }

    #[test]
    fn test_set_merge_and_pop() {
        let mut a: RbSet<u32> = (0..50).collect();
        let b: RbSet<u32> = (50..75).collect();
        a.merge(b);
        a.check_invariants().unwrap();
        assert_eq!(a.len(), 75);
        assert_eq!(a.pop_first(), Some(0));
        assert_eq!(a.pop_last(), Some(74));
        let owned: Vec<u32> = a.into_iter().collect();
        assert_eq!(owned, (1..74).collect::<Vec<_>>());
    }
}
