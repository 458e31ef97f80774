//! Intrusive red-black tree
//!
//! The tree never allocates. Callers embed an [`RbNode`] in their own
//! records, search for an insertion point, link the node as a red leaf and
//! hand it to [`RbRoot::insert_color`]; [`RbRoot::erase`] unlinks it again.
//! The node layout is C-compatible (`struct rb_node`), with the parent pointer
//! and the node color packed into one word.
//!
//! # Layers
//!
//! - [`RbNode`] / [`RbRoot`] / [`RbRootCached`]: raw pointer API. Every
//!   operation is an `unsafe fn`; membership and liveness are the caller's
//!   business.
//! - [`RbAugment`]: rotation/copy/propagate hooks for per-node aggregates.
//! - [`RbTree`]: typed handle over records implementing [`RbLinked`], with
//!   the augmentation callbacks injected at construction.
//!
//! # Example
//!
//! ```
//! use redwood_rbtree::{impl_rb_linked, RbNode, RbTree};
//! use core::ptr::NonNull;
//!
//! struct Task {
//!     deadline: u64,
//!     rb: RbNode,
//! }
//! impl_rb_linked!(Task, rb);
//!
//! let mut a = Task { deadline: 30, rb: RbNode::new() };
//! let mut b = Task { deadline: 10, rb: RbNode::new() };
//!
//! let mut queue: RbTree<Task> = RbTree::new();
//! unsafe {
//!     queue.insert(NonNull::from(&mut a), |x, y| x.deadline < y.deadline);
//!     queue.insert(NonNull::from(&mut b), |x, y| x.deadline < y.deadline);
//! }
//! assert_eq!(queue.first().map(|t| t.deadline), Some(10));
//! ```

#![cfg_attr(not(test), no_std)]

mod augment;
mod cached;
mod erase;
mod error;
mod insert;
mod node;
mod search;
mod traverse;
mod tree;
mod validate;

pub use augment::{NoAugment, RbAugment};
pub use cached::RbRootCached;
pub use error::{RbError, RbResult};
pub use node::{RbColor, RbNode, RbRoot};
pub use traverse::{Iter, Postorder};
pub use tree::{RbLinked, RbTree, TreeIter};

#[doc(hidden)]
pub use memoffset as __memoffset;

/// Recover the record that embeds an [`RbNode`].
///
/// `rb_entry!(ptr, Type, field)` turns a pointer to `Type::field` back into a
/// `*mut Type`. The result is only meaningful if `ptr` really points into a
/// `Type`.
#[macro_export]
macro_rules! rb_entry {
    ($ptr:expr, $type:path, $member:ident) => {
        ($ptr as *const $crate::RbNode as *mut u8)
            .wrapping_sub($crate::__memoffset::offset_of!($type, $member)) as *mut $type
    };
}
