//! In-order and postorder traversal
//!
//! Traversal only follows the links stored in the nodes; it never needs a
//! stack or a comparator.

use core::marker::PhantomData;
use core::ptr;

use crate::node::{RbNode, RbRoot};

impl RbRoot {
    /// Smallest node, or null if the tree is empty.
    pub fn first(&self) -> *mut RbNode {
        let mut n = self.rb_node;
        if n.is_null() {
            return ptr::null_mut();
        }
        // Safety: every node reachable from a root is valid
        unsafe {
            while !(*n).rb_left.is_null() {
                n = (*n).rb_left;
            }
        }
        n
    }

    /// Largest node, or null if the tree is empty.
    pub fn last(&self) -> *mut RbNode {
        let mut n = self.rb_node;
        if n.is_null() {
            return ptr::null_mut();
        }
        unsafe {
            while !(*n).rb_right.is_null() {
                n = (*n).rb_right;
            }
        }
        n
    }

    /// First node of a postorder walk (children before parents).
    pub fn first_postorder(&self) -> *mut RbNode {
        if self.rb_node.is_null() {
            return ptr::null_mut();
        }
        unsafe { RbNode::left_deepest(self.rb_node) }
    }

    /// Ascending iteration over the nodes.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.first(),
            _root: PhantomData,
        }
    }

    /// Postorder iteration. The iterator reads a node's successor before
    /// yielding it, so the caller may free each yielded node (without
    /// rebalancing the tree) as it goes.
    pub fn postorder(&self) -> Postorder<'_> {
        Postorder {
            next: self.first_postorder(),
            _root: PhantomData,
        }
    }
}

impl RbNode {
    /// In-order successor, or null for the last node.
    ///
    /// A cleared node (see [`RbNode::clear`]) has no successor.
    ///
    /// # Safety
    /// `node` must be a member of a valid tree, or a cleared node.
    pub unsafe fn next(node: *const RbNode) -> *mut RbNode {
        if (*node).is_cleared() {
            return ptr::null_mut();
        }

        // A right child means the successor is the leftmost node below it.
        let mut node = node as *mut RbNode;
        if !(*node).rb_right.is_null() {
            node = (*node).rb_right;
            while !(*node).rb_left.is_null() {
                node = (*node).rb_left;
            }
            return node;
        }

        // Otherwise climb while we are a right child; the first ancestor
        // reached from its left side is next.
        let mut parent = (*node).parent();
        while !parent.is_null() && node == (*parent).rb_right {
            node = parent;
            parent = (*node).parent();
        }
        parent
    }

    /// In-order predecessor, or null for the first node.
    ///
    /// # Safety
    /// Same as [`RbNode::next`].
    pub unsafe fn prev(node: *const RbNode) -> *mut RbNode {
        if (*node).is_cleared() {
            return ptr::null_mut();
        }

        let mut node = node as *mut RbNode;
        if !(*node).rb_left.is_null() {
            node = (*node).rb_left;
            while !(*node).rb_right.is_null() {
                node = (*node).rb_right;
            }
            return node;
        }

        let mut parent = (*node).parent();
        while !parent.is_null() && node == (*parent).rb_left {
            node = parent;
            parent = (*node).parent();
        }
        parent
    }

    /// Postorder successor, or null once the root has been visited.
    ///
    /// # Safety
    /// `node` must be null or a member of a valid tree.
    pub unsafe fn next_postorder(node: *const RbNode) -> *mut RbNode {
        if node.is_null() {
            return ptr::null_mut();
        }
        let parent = (*node).parent();

        // Left child with a right sibling: descend into the sibling's
        // deepest node. Otherwise the parent is next.
        if !parent.is_null()
            && node == (*parent).rb_left as *const RbNode
            && !(*parent).rb_right.is_null()
        {
            Self::left_deepest((*parent).rb_right)
        } else {
            parent
        }
    }

    /// Deepest node reached by preferring left children, falling back to
    /// right ones.
    unsafe fn left_deepest(mut node: *mut RbNode) -> *mut RbNode {
        loop {
            if !(*node).rb_left.is_null() {
                node = (*node).rb_left;
            } else if !(*node).rb_right.is_null() {
                node = (*node).rb_right;
            } else {
                return node;
            }
        }
    }
}

/// Ascending iterator over the nodes of an [`RbRoot`].
pub struct Iter<'a> {
    next: *mut RbNode,
    _root: PhantomData<&'a RbRoot>,
}

impl Iterator for Iter<'_> {
    type Item = *mut RbNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() {
            return None;
        }
        let node = self.next;
        // Safety: the borrow of the root keeps the tree unchanged
        self.next = unsafe { RbNode::next(node) };
        Some(node)
    }
}

/// Postorder iterator over the nodes of an [`RbRoot`].
pub struct Postorder<'a> {
    next: *mut RbNode,
    _root: PhantomData<&'a RbRoot>,
}

impl Iterator for Postorder<'_> {
    type Item = *mut RbNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() {
            return None;
        }
        let node = self.next;
        self.next = unsafe { RbNode::next_postorder(node) };
        Some(node)
    }
}
