//! Invariant checker
//!
//! Walks the tree in order without recursion or allocation. Child links are
//! checked against the child's parent pointer before the walk relies on that
//! parent pointer to climb back up.

use core::ptr;

use crate::error::{RbError, RbResult};
use crate::node::{RbNode, RbRoot};

impl RbRoot {
    /// Check the red-black invariants and return the node count.
    pub fn validate(&self) -> RbResult<usize> {
        self.validate_by(|_, _| true)
    }

    /// [`RbRoot::validate`] plus an ordering check: `in_order(prev, node)`
    /// must hold for every pair of consecutive nodes.
    pub fn validate_by<F>(&self, mut in_order: F) -> RbResult<usize>
    where
        F: FnMut(*const RbNode, *const RbNode) -> bool,
    {
        let root = self.rb_node;
        if root.is_null() {
            return Ok(0);
        }

        // Safety: every node reachable from a root is valid
        unsafe {
            if !(*root).parent().is_null() {
                return Err(RbError::RootHasParent(root as usize));
            }
            if (*root).is_red() {
                return Err(RbError::RedRoot(root as usize));
            }

            let mut expected: Option<usize> = None;
            let mut count = 0;
            let mut prev: *const RbNode = ptr::null();

            // Black nodes from the root down to `node`, both included
            let mut depth = 1;
            let mut node = root;
            descend_left(&mut node, &mut depth)?;

            loop {
                count += 1;

                let parent = (*node).parent();
                if (*node).is_red() && !parent.is_null() && (*parent).is_red() {
                    return Err(RbError::RedViolation(node as usize));
                }

                if (*node).rb_left.is_null() || (*node).rb_right.is_null() {
                    match expected {
                        None => expected = Some(depth),
                        Some(want) if want != depth => {
                            return Err(RbError::BlackHeight {
                                node: node as usize,
                                expected: want,
                                found: depth,
                            });
                        }
                        Some(_) => {}
                    }
                }

                if !prev.is_null() && !in_order(prev, node) {
                    return Err(RbError::OutOfOrder(node as usize));
                }
                prev = node;

                let right = (*node).rb_right;
                if !right.is_null() {
                    check_child(node, right)?;
                    node = right;
                    depth += black(node);
                    descend_left(&mut node, &mut depth)?;
                    continue;
                }

                // Climb until we arrive from a left child
                loop {
                    let parent = (*node).parent();
                    depth -= black(node);
                    if parent.is_null() {
                        return Ok(count);
                    }
                    let from_left = (*parent).rb_left == node;
                    node = parent;
                    if from_left {
                        break;
                    }
                }
            }
        }
    }

    /// Number of black nodes on the path from the root to the leftmost nil.
    pub fn black_height(&self) -> usize {
        let mut height = 0;
        let mut node = self.rb_node;
        unsafe {
            while !node.is_null() {
                height += black(node);
                node = (*node).rb_left;
            }
        }
        height
    }
}

#[inline]
unsafe fn black(node: *const RbNode) -> usize {
    (*node).is_black() as usize
}

unsafe fn check_child(parent: *const RbNode, child: *const RbNode) -> RbResult<()> {
    if (*child).parent() as *const RbNode != parent {
        return Err(RbError::BrokenParentLink(child as usize));
    }
    Ok(())
}

unsafe fn descend_left(node: &mut *mut RbNode, depth: &mut usize) -> RbResult<()> {
    loop {
        let left = (**node).rb_left;
        if left.is_null() {
            return Ok(());
        }
        check_child(*node, left)?;
        *node = left;
        *depth += black(left);
    }
}
