//! Linking and comparator-driven helpers
//!
//! The core tree never compares keys. These helpers run the usual descent
//! with a caller-supplied ordering and then hand off to the rebalancing code.

use core::cmp::Ordering;
use core::ptr;

use crate::node::{RbNode, RbRoot};

impl RbNode {
    /// Link `self` as a red leaf below `parent`, storing it in `*link`.
    ///
    /// `link` is the child slot found by the descent (`&mut parent.rb_left`,
    /// `&mut parent.rb_right`, or `&mut root.rb_node` with a null `parent`).
    /// The tree is not balanced until [`RbRoot::insert_color`] runs.
    ///
    /// # Safety
    /// `link` must point to an empty child slot of `parent` (or the root slot).
    pub unsafe fn link(&mut self, parent: *mut RbNode, link: *mut *mut RbNode) {
        self.__rb_parent_color = parent as usize;
        self.rb_left = ptr::null_mut();
        self.rb_right = ptr::null_mut();
        *link = self;
    }
}

impl RbRoot {
    /// Descend with `less` and return the parent and child slot where `node`
    /// belongs, plus whether it only ever went left. Equal keys go to the
    /// right, after existing ones.
    pub(crate) unsafe fn descend<F>(
        &mut self,
        node: *const RbNode,
        mut less: F,
    ) -> (*mut RbNode, *mut *mut RbNode, bool)
    where
        F: FnMut(*const RbNode, *const RbNode) -> bool,
    {
        let mut link: *mut *mut RbNode = &mut self.rb_node;
        let mut parent = ptr::null_mut();
        let mut leftmost = true;

        while !(*link).is_null() {
            parent = *link;
            if less(node, parent) {
                link = &mut (*parent).rb_left;
            } else {
                link = &mut (*parent).rb_right;
                leftmost = false;
            }
        }
        (parent, link, leftmost)
    }

    /// Insert `node` at the position given by `less`, then rebalance.
    ///
    /// `less(a, b)` must be a strict weak ordering. Nodes that compare equal
    /// to existing ones are placed after them.
    ///
    /// # Safety
    /// `node` must not be a member of any tree; all members must be valid.
    pub unsafe fn add<F>(&mut self, node: *mut RbNode, less: F)
    where
        F: FnMut(*const RbNode, *const RbNode) -> bool,
    {
        let (parent, link, _) = self.descend(node, less);
        (*node).link(parent, link);
        self.insert_color(node);
    }

    /// Find a node matching `key`.
    ///
    /// `compare(key, node)` orders the key against a node. With duplicate
    /// keys, any of the equal nodes may be returned. Returns null if nothing
    /// matches.
    pub fn find<K, F>(&self, key: &K, mut compare: F) -> *mut RbNode
    where
        K: ?Sized,
        F: FnMut(&K, *const RbNode) -> Ordering,
    {
        let mut node = self.rb_node;
        // Safety: every node reachable from a root is valid
        unsafe {
            while !node.is_null() {
                match compare(key, node) {
                    Ordering::Less => node = (*node).rb_left,
                    Ordering::Greater => node = (*node).rb_right,
                    Ordering::Equal => return node,
                }
            }
        }
        ptr::null_mut()
    }

    /// Find a node equal to `node` or insert `node`.
    ///
    /// `compare(a, b)` orders two nodes. Returns the existing match (leaving
    /// `node` untouched) or null after inserting `node`.
    ///
    /// # Safety
    /// Same as [`RbRoot::add`].
    pub unsafe fn find_add<F>(&mut self, node: *mut RbNode, mut compare: F) -> *mut RbNode
    where
        F: FnMut(*const RbNode, *const RbNode) -> Ordering,
    {
        let mut link: *mut *mut RbNode = &mut self.rb_node;
        let mut parent = ptr::null_mut();

        while !(*link).is_null() {
            parent = *link;
            match compare(node, parent) {
                Ordering::Less => link = &mut (*parent).rb_left,
                Ordering::Greater => link = &mut (*parent).rb_right,
                Ordering::Equal => return parent,
            }
        }

        (*node).link(parent, link);
        self.insert_color(node);
        ptr::null_mut()
    }

    /// Put `new` in `victim`'s place without rebalancing.
    ///
    /// `new` must sort exactly where `victim` did. `victim` is left with its
    /// old links and is no longer part of the tree.
    ///
    /// # Safety
    /// `victim` must be a member of this tree and `new` must not be a member
    /// of any tree.
    pub unsafe fn replace_node(&mut self, victim: *mut RbNode, new: *mut RbNode) {
        let parent = (*victim).parent();

        // Copy the pointers and color first, then fix the surroundings.
        *new = RbNode {
            __rb_parent_color: (*victim).__rb_parent_color,
            rb_left: (*victim).rb_left,
            rb_right: (*victim).rb_right,
        };

        if !(*victim).rb_left.is_null() {
            (*(*victim).rb_left).set_parent(new);
        }
        if !(*victim).rb_right.is_null() {
            (*(*victim).rb_right).set_parent(new);
        }
        self.change_child(victim, new, parent);
    }
}
