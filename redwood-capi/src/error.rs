//! Error code translation between the tree and C callers
//!
//! Converts validation results into the negative-errno convention.

use libc::{c_int, EINVAL};
use redwood_rbtree::{RbError, RbResult};

/// Convert a validation result to errno format
///
/// - Ok(value) => 0
/// - Err(error) => negative errno
pub fn result_to_errno<T>(result: RbResult<T>) -> c_int {
    match result {
        Ok(_) => 0,
        Err(e) => error_to_errno(&e),
    }
}

/// Every invariant violation means the caller handed over a corrupt tree.
pub fn error_to_errno(error: &RbError) -> c_int {
    match error {
        RbError::RedRoot(_)
        | RbError::RootHasParent(_)
        | RbError::RedViolation(_)
        | RbError::BlackHeight { .. }
        | RbError::BrokenParentLink(_)
        | RbError::OutOfOrder(_)
        | RbError::LengthMismatch { .. } => -EINVAL,
    }
}
