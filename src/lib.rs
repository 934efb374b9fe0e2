//! # rbtree-rs
//!
//! An ordered map and set built on a red-black tree.
//!
//! Nodes are kept in an index arena: child links are handles into the arena
//! and the parent back-link is a plain handle too, so rotations and splices
//! never juggle raw pointers. Insertion, deletion and lookup are `O(log n)` in
//! the worst case.
//!
//! The tree is not internally synchronized. Wrap it in a lock (one lock for
//! the whole structure) if several threads need it.
//!
//! ## Example
//!
//! ```rust
//! use rbtree_rs::RbTree;
//!
//! let mut tree: RbTree<u32, &str> = RbTree::new();
//! tree.insert(7, "seven");
//! tree.insert(3, "three");
//! assert!(!tree.insert(7, "again")); // present keys are left alone
//!
//! assert_eq!(tree.get(&7), Some(&"seven"));
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![3, 7]);
//!
//! assert_eq!(tree.remove(&3), Some("three"));
//! assert!(tree.delete(&3).is_err());
//! ```

#![deny(unsafe_code)]

mod error;
mod iter;
mod node;
mod set;
mod tree;

pub use error::{InvariantViolation, Result, TreeError};
pub use iter::{InOrder, IntoIter, Keys, LevelOrder, PreOrder, Values};
pub use set::{RbSet, SetIter};
pub use tree::RbTree;

#[cfg(test)]
mod proptests;
