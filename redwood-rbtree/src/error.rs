//! Invariant violations reported by validation
//!
//! Node addresses are carried as plain `usize` so errors stay `Send`,
//! comparable, and printable without dereferencing anything.

use thiserror::Error;

/// A broken red-black or ordering invariant, with the address of the
/// offending node.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RbError {
    #[error("root node {0:#x} is red")]
    RedRoot(usize),

    #[error("root node {0:#x} has a parent")]
    RootHasParent(usize),

    #[error("red node {0:#x} has a red parent")]
    RedViolation(usize),

    #[error("node {node:#x} ends a path with {found} black nodes, expected {expected}")]
    BlackHeight {
        node: usize,
        expected: usize,
        found: usize,
    },

    #[error("child {0:#x} does not point back at its parent")]
    BrokenParentLink(usize),

    #[error("node {0:#x} is out of order")]
    OutOfOrder(usize),

    #[error("tree holds {found} nodes but records {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Result type for tree validation
pub type RbResult<T> = core::result::Result<T, RbError>;
