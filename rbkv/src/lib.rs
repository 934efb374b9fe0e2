//! # rbkv
//!
//! Thread-safe wrappers over [`rbtree_rs`].
//!
//! [`RbKV`] puts one reader-writer lock around a whole [`RbTree`]: lookups
//! share the lock, every write holds it exclusively, and the guard is released
//! on every exit path. [`SyncStack`] does the same for a LIFO stack with a
//! plain mutex.
//!
//! ## Example
//!
//! ```rust
//! use rbkv::RbKV;
//!
//! let kv: RbKV<u32, String> = RbKV::new();
//! kv.insert(2, "two".to_string());
//! kv.insert(1, "one".to_string());
//!
//! assert_eq!(kv.get(&1).as_deref(), Some("one"));
//! assert_eq!(kv.in_order().len(), 2);
//! assert!(kv.delete(&3).is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod stack;

pub use rbtree_rs::{RbTree, TreeError};
pub use stack::SyncStack;

use std::borrow::Borrow;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tracing::{debug, error};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors reported by [`RbKV`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The key is not in the store.
    #[error("key not found")]
    NotFound,
    /// The underlying tree reported a failure.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Memory usage statistics for the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    /// Bytes reserved by the tree, vacant arena slots included
    pub node_bytes: usize,
    /// Number of keys stored
    pub num_keys: usize,
    /// Bytes per key (calculated)
    pub bytes_per_key: f64,
}

/// Configuration for the [`RbKV`] store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial capacity hint for number of keys
    pub initial_capacity: usize,
    /// Check every red-black invariant after each write and panic on a
    /// violation
    pub verify_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            verify_writes: cfg!(debug_assertions),
        }
    }
}

/// An ordered key-value store guarded by a single reader-writer lock.
pub struct RbKV<K, V> {
    inner: RwLock<RbTree<K, V>>,
    /// Mirrors the tree length so `len` never takes the lock.
    len: AtomicUsize,
    config: Config,
}

impl<K, V> RbKV<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    /// Create a new empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new store with the given configuration.
    pub fn with_config(config: Config) -> Self {
        debug!(
            initial_capacity = config.initial_capacity,
            verify_writes = config.verify_writes,
            "creating store"
        );
        Self {
            inner: RwLock::new(RbTree::with_capacity(config.initial_capacity)),
            len: AtomicUsize::new(0),
            config,
        }
    }

    /// Insert a key-value pair.
    ///
    /// Returns `false` and keeps the stored value if the key already existed.
    pub fn insert(&self, key: K, value: V) -> bool {
        let mut inner = self.inner.write();
        let inserted = inner.insert(key, value);
        if inserted {
            self.len.fetch_add(1, Ordering::Relaxed);
            self.verify(&inner, "insert");
        }
        inserted
    }

    /// Get a copy of the value for a key.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().get(key).cloned()
    }

    /// Check if a key exists in the store.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    /// Remove a key from the store.
    ///
    /// Returns the value if the key existed.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut inner = self.inner.write();
        let old = inner.remove(key);
        if old.is_some() {
            self.len.fetch_sub(1, Ordering::Relaxed);
            self.verify(&inner, "remove");
        }
        old
    }

    /// Remove a key, reporting [`StoreError::NotFound`] if it was absent.
    pub fn delete<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut inner = self.inner.write();
        match inner.delete(key) {
            Ok(value) => {
                self.len.fetch_sub(1, Ordering::Relaxed);
                self.verify(&inner, "delete");
                Ok(value)
            }
            Err(TreeError::NotFound) => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Smallest entry.
    pub fn first(&self) -> Option<(K, V)> {
        let inner = self.inner.read();
        inner.first_key_value().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(K, V)> {
        let inner = self.inner.read();
        inner.last_key_value().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Snapshot of all entries in ascending key order.
    pub fn in_order(&self) -> Vec<(K, V)> {
        let inner = self.inner.read();
        inner.in_order().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Snapshot of all entries in pre-order (node, left, right).
    pub fn pre_order(&self) -> Vec<(K, V)> {
        let inner = self.inner.read();
        inner.pre_order().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Snapshot of all entries in breadth-first order.
    pub fn level_order(&self) -> Vec<(K, V)> {
        let inner = self.inner.read();
        inner.level_order().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get the number of keys in the store.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get memory usage statistics.
    pub fn memory_usage(&self) -> MemoryStats {
        let inner = self.inner.read();
        let node_bytes = inner.memory_usage();
        let num_keys = inner.len();
        MemoryStats {
            node_bytes,
            num_keys,
            bytes_per_key: if num_keys > 0 {
                node_bytes as f64 / num_keys as f64
            } else {
                0.0
            },
        }
    }

    /// Rebuild the node arena without vacant slots. Returns the number of
    /// slots reclaimed.
    pub fn compact(&self) -> usize {
        let mut inner = self.inner.write();
        let reclaimed = inner.compact();
        inner.shrink_to_fit();
        debug!(reclaimed, len = inner.len(), "compacted store");
        self.verify(&inner, "compact");
        reclaimed
    }

    /// Move every entry of `other` into the store. Keys already present keep
    /// their stored value.
    pub fn merge(&self, other: RbTree<K, V>) {
        let mut inner = self.inner.write();
        inner.merge(other);
        self.len.store(inner.len(), Ordering::Relaxed);
        self.verify(&inner, "merge");
    }

    /// Run `f` against the tree under a shared lock.
    pub fn with_tree<R>(&self, f: impl FnOnce(&RbTree<K, V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Check every tree invariant under a shared lock.
    pub fn check(&self) -> Result<()> {
        self.inner.read().check_invariants()?;
        Ok(())
    }

    fn verify(&self, tree: &RbTree<K, V>, op: &'static str) {
        if !self.config.verify_writes {
            return;
        }
        if let Err(e) = tree.check_invariants() {
            error!(op, error = %e, "tree invariant broken after write");
            panic!("tree invariant broken after {op}: {e}");
        }
    }
}

impl<K: Ord + Clone, V: Clone> Default for RbKV<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
