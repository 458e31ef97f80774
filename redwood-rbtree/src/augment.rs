//! Augmentation hooks
//!
//! An augmented tree keeps a per-node value derived from the node's subtree
//! (a subtree maximum, a subtree size, ...). The tree does not know what the
//! value means; it only calls these hooks whenever the shape around a node
//! changes.

use crate::node::RbNode;

/// Callbacks run by the augmented insert/erase paths.
///
/// All hooks default to no-ops.
pub trait RbAugment {
    /// Recompute the aggregate of `node` and its ancestors, stopping before
    /// `stop` (or at the root when `stop` is null). Implementations may stop
    /// early once a node's value comes out unchanged.
    ///
    /// # Safety
    /// `node` must be null or a member of the tree being modified.
    unsafe fn propagate(&self, _node: *mut RbNode, _stop: *mut RbNode) {}

    /// `new` takes `old`'s position in the tree; copy its aggregate.
    ///
    /// # Safety
    /// Both pointers must be valid nodes.
    unsafe fn copy(&self, _old: *mut RbNode, _new: *mut RbNode) {}

    /// `new` replaced `old` as subtree root during a rotation. `new` inherits
    /// the old subtree aggregate; `old` must be recomputed from its new
    /// children.
    ///
    /// # Safety
    /// Both pointers must be valid nodes.
    unsafe fn rotate(&self, _old: *mut RbNode, _new: *mut RbNode) {}
}

/// Hook set for trees without aggregates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAugment;

impl RbAugment for NoAugment {
    #[inline(always)]
    unsafe fn rotate(&self, old: *mut RbNode, new: *mut RbNode) {
        tracing::trace!(?old, ?new, "rotate");
    }
}

/// Declare an [`RbAugment`] implementation that maintains a subtree maximum.
///
/// ```ignore
/// rb_declare_callbacks_max!(pub MaxEnd, Interval, rb, subtree_end, |i: &Interval| i.end);
/// ```
///
/// generates a unit struct `MaxEnd` whose hooks keep `Interval::subtree_end`
/// equal to the largest `i.end` in each node's subtree.
#[macro_export]
macro_rules! rb_declare_callbacks_max {
    ($vis:vis $name:ident, $type:path, $field:ident, $augmented:ident, $compute:expr) => {
        #[derive(Debug, Default, Clone, Copy)]
        $vis struct $name;

        impl $name {
            /// Returns true if `exit` is set and the stored value was already
            /// up to date.
            #[inline]
            unsafe fn compute_max(node: *mut $type, exit: bool) -> bool {
                let compute = $compute;
                let mut max = compute(&*node);
                let left = (*node).$field.rb_left;
                if !left.is_null() {
                    let child = $crate::rb_entry!(left, $type, $field);
                    if (*child).$augmented > max {
                        max = (*child).$augmented;
                    }
                }
                let right = (*node).$field.rb_right;
                if !right.is_null() {
                    let child = $crate::rb_entry!(right, $type, $field);
                    if (*child).$augmented > max {
                        max = (*child).$augmented;
                    }
                }
                if exit && (*node).$augmented == max {
                    return true;
                }
                (*node).$augmented = max;
                false
            }
        }

        impl $crate::RbAugment for $name {
            unsafe fn propagate(&self, mut rb: *mut $crate::RbNode, stop: *mut $crate::RbNode) {
                while rb != stop {
                    let node = $crate::rb_entry!(rb, $type, $field);
                    if Self::compute_max(node, true) {
                        break;
                    }
                    rb = (*rb).parent();
                }
            }

            unsafe fn copy(&self, old: *mut $crate::RbNode, new: *mut $crate::RbNode) {
                let old = $crate::rb_entry!(old, $type, $field);
                let new = $crate::rb_entry!(new, $type, $field);
                (*new).$augmented = (*old).$augmented;
            }

            unsafe fn rotate(&self, old: *mut $crate::RbNode, new: *mut $crate::RbNode) {
                let old = $crate::rb_entry!(old, $type, $field);
                let new = $crate::rb_entry!(new, $type, $field);
                (*new).$augmented = (*old).$augmented;
                Self::compute_max(old, false);
            }
        }
    };
}
