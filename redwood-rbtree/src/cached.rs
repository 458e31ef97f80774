//! Root with a cached leftmost node
//!
//! Keeps `first()` O(1) for priority-queue style users. Callers tell the
//! insert path whether the new node became leftmost; erase updates the cache
//! itself.

use core::ptr;

use static_assertions::assert_eq_size;

use crate::augment::{NoAugment, RbAugment};
use crate::node::{RbNode, RbRoot};

/// Red-Black tree root that also remembers its smallest node
#[repr(C)]
#[derive(Debug)]
pub struct RbRootCached {
    pub rb_root: RbRoot,
    pub rb_leftmost: *mut RbNode,
}

assert_eq_size!(RbRootCached, [usize; 2]);

unsafe impl Send for RbRootCached {}
unsafe impl Sync for RbRootCached {}

impl RbRootCached {
    pub const fn new() -> Self {
        Self {
            rb_root: RbRoot::new(),
            rb_leftmost: ptr::null_mut(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rb_root.is_empty()
    }

    /// Smallest node in O(1), or null if empty.
    #[inline]
    pub fn first_cached(&self) -> *mut RbNode {
        self.rb_leftmost
    }

    /// [`RbRoot::insert_color`], recording `node` as the new leftmost if the
    /// descent never went right.
    ///
    /// # Safety
    /// Same as [`RbRoot::insert_color`].
    pub unsafe fn insert_color_cached(&mut self, node: *mut RbNode, leftmost: bool) {
        self.insert_augmented_cached(node, leftmost, &NoAugment);
    }

    /// # Safety
    /// Same as [`RbRoot::insert_augmented`].
    pub unsafe fn insert_augmented_cached<A>(&mut self, node: *mut RbNode, leftmost: bool, augment: &A)
    where
        A: RbAugment + ?Sized,
    {
        if leftmost {
            self.rb_leftmost = node;
        }
        self.rb_root.insert_augmented(node, augment);
    }

    /// Erase `node`, returning the new leftmost when `node` was leftmost,
    /// null otherwise.
    ///
    /// # Safety
    /// Same as [`RbRoot::erase`].
    pub unsafe fn erase_cached(&mut self, node: *mut RbNode) -> *mut RbNode {
        self.erase_augmented_cached(node, &NoAugment)
    }

    /// # Safety
    /// Same as [`RbRoot::erase`].
    pub unsafe fn erase_augmented_cached<A>(&mut self, node: *mut RbNode, augment: &A) -> *mut RbNode
    where
        A: RbAugment + ?Sized,
    {
        let mut leftmost = ptr::null_mut();
        if self.rb_leftmost == node {
            leftmost = RbNode::next(node);
            self.rb_leftmost = leftmost;
        }
        self.rb_root.erase_augmented(node, augment);
        leftmost
    }

    /// [`RbRoot::add`] keeping the cache current. Returns true if `node` is
    /// the new leftmost.
    ///
    /// # Safety
    /// Same as [`RbRoot::add`].
    pub unsafe fn add_cached<F>(&mut self, node: *mut RbNode, less: F) -> bool
    where
        F: FnMut(*const RbNode, *const RbNode) -> bool,
    {
        let (parent, link, leftmost) = self.rb_root.descend(node, less);
        (*node).link(parent, link);
        self.insert_color_cached(node, leftmost);
        leftmost
    }

    /// [`RbRoot::replace_node`] keeping the cache current.
    ///
    /// # Safety
    /// Same as [`RbRoot::replace_node`].
    pub unsafe fn replace_node_cached(&mut self, victim: *mut RbNode, new: *mut RbNode) {
        if self.rb_leftmost == victim {
            self.rb_leftmost = new;
        }
        self.rb_root.replace_node(victim, new);
    }
}

impl Default for RbRootCached {
    fn default() -> Self {
        Self::new()
    }
}
