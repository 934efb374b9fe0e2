//! Error types for tree operations.

/// Result type for fallible tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors reported by [`RbTree`](crate::RbTree) and [`RbSet`](crate::RbSet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The key is not present; nothing was changed.
    #[error("key not found")]
    NotFound,

    /// A structural check failed. This is a bug in the tree, not a caller error.
    #[error("red-black invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// A red-black or structural invariant found broken by
/// [`RbTree::check_invariants`](crate::RbTree::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("root is red")]
    RedRoot,

    #[error("red node has a red child")]
    RedRedEdge,

    #[error("black height differs between sibling subtrees ({left} vs {right})")]
    BlackHeightMismatch { left: usize, right: usize },

    #[error("keys are not in strictly ascending in-order sequence")]
    OrderViolation,

    #[error("child does not point back at its parent")]
    BrokenParentLink,

    #[error("double-black marker survived a completed operation")]
    StrayDoubleBlack,

    #[error("tree records {expected} entries but {found} are reachable")]
    LenMismatch { expected: usize, found: usize },
}
