//! Node and root handles
//!
//! This is the Rust equivalent of `struct rb_node` / `struct rb_root`. The
//! parent pointer and the color share `__rb_parent_color`: nodes are
//! `usize`-aligned, so the lowest bit of the parent address is free and holds
//! the color.

use core::ptr;
use static_assertions::{assert_eq_align, assert_eq_size};

/// Bit of `__rb_parent_color` holding the color
pub(crate) const COLOR_MASK: usize = 1;

/// Red-Black tree node color
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RbColor {
    Red = 0,
    Black = 1,
}

/// Red-Black tree node
///
/// Embedded in the caller's record. The tree links nodes together but never
/// owns or frees them.
#[repr(C)]
#[derive(Debug)]
pub struct RbNode {
    /// Parent node pointer with color encoded in lowest bit
    pub __rb_parent_color: usize,
    pub rb_left: *mut RbNode,
    pub rb_right: *mut RbNode,
}

assert_eq_size!(RbNode, [usize; 3]);
assert_eq_align!(RbNode, usize);

// Safety: RbNode is a raw pointer container; callers serialize all access
// to a tree externally
unsafe impl Send for RbNode {}
unsafe impl Sync for RbNode {}

impl RbNode {
    /// Red, parentless node with no children
    pub const fn new() -> Self {
        Self {
            __rb_parent_color: 0,
            rb_left: ptr::null_mut(),
            rb_right: ptr::null_mut(),
        }
    }

    /// Parent with the color bit masked off; null at the root
    #[inline]
    pub fn parent(&self) -> *mut RbNode {
        (self.__rb_parent_color & !COLOR_MASK) as *mut RbNode
    }

    /// Parent of a node known to be red: the color bit is zero, so the word
    /// is the pointer itself.
    #[inline]
    pub(crate) fn red_parent(&self) -> *mut RbNode {
        debug_assert!(self.is_red());
        self.__rb_parent_color as *mut RbNode
    }

    /// Color stored in bit 0 of `__rb_parent_color`
    #[inline]
    pub fn color(&self) -> RbColor {
        if (self.__rb_parent_color & COLOR_MASK) == 0 {
            RbColor::Red
        } else {
            RbColor::Black
        }
    }

    #[doc(alias = "rb_is_red")]
    #[inline]
    pub fn is_red(&self) -> bool {
        self.color() == RbColor::Red
    }

    #[doc(alias = "rb_is_black")]
    #[inline]
    pub fn is_black(&self) -> bool {
        self.color() == RbColor::Black
    }

    /// Set the parent pointer, keeping the color
    #[inline]
    pub fn set_parent(&mut self, parent: *mut RbNode) {
        let color = self.__rb_parent_color & COLOR_MASK;
        self.__rb_parent_color = (parent as usize) | color;
    }

    /// Set the color, keeping the parent pointer
    #[inline]
    pub fn set_color(&mut self, color: RbColor) {
        let parent = self.__rb_parent_color & !COLOR_MASK;
        self.__rb_parent_color = parent | (color as usize);
    }

    /// Set parent and color in one store
    #[inline]
    pub fn set_parent_color(&mut self, parent: *mut RbNode, color: RbColor) {
        self.__rb_parent_color = (parent as usize) | (color as usize);
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.__rb_parent_color |= RbColor::Black as usize;
    }

    /// Mark the node as not belonging to any tree.
    ///
    /// A cleared node points at itself as parent; [`RbNode::is_cleared`]
    /// detects that state and the traversal functions treat it as a
    /// standalone node.
    #[inline]
    pub fn clear(&mut self) {
        self.__rb_parent_color = self as *mut RbNode as usize;
    }

    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.parent() == self as *const RbNode as *mut RbNode
    }
}

impl Default for RbNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Red-Black tree root
#[repr(C)]
#[derive(Debug)]
pub struct RbRoot {
    pub rb_node: *mut RbNode,
}

assert_eq_size!(RbRoot, usize);
assert_eq_align!(RbRoot, usize);

unsafe impl Send for RbRoot {}
unsafe impl Sync for RbRoot {}

impl RbRoot {
    /// Empty root; usable in `static` initializers
    pub const fn new() -> Self {
        Self {
            rb_node: ptr::null_mut(),
        }
    }

    /// No node is linked at the top
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rb_node.is_null()
    }

    /// Point the slot that held `old` (in `parent`, or the root) at `new`.
    #[inline(always)]
    pub(crate) unsafe fn change_child(
        &mut self,
        old: *mut RbNode,
        new: *mut RbNode,
        parent: *mut RbNode,
    ) {
        if parent.is_null() {
            self.rb_node = new;
        } else if (*parent).rb_left == old {
            (*parent).rb_left = new;
        } else {
            (*parent).rb_right = new;
        }
    }

    /// Finish a rotation: `new` takes over `old`'s parent and color, `old`
    /// hangs below `new` with `color`.
    #[inline(always)]
    pub(crate) unsafe fn rotate_set_parents(
        &mut self,
        old: *mut RbNode,
        new: *mut RbNode,
        color: RbColor,
    ) {
        let parent = (*old).parent();
        (*new).__rb_parent_color = (*old).__rb_parent_color;
        (*old).set_parent_color(new, color);
        self.change_child(old, new, parent);
    }

    /// `node` is the root or a child of its recorded parent.
    ///
    /// O(1) membership check used to guard `erase` in debug builds.
    pub(crate) unsafe fn is_linked(&self, node: *const RbNode) -> bool {
        let parent = (*node).parent();
        if parent.is_null() {
            self.rb_node as *const RbNode == node
        } else {
            (*parent).rb_left as *const RbNode == node
                || (*parent).rb_right as *const RbNode == node
        }
    }

    /// Run full validation when `debug-invariants` is enabled.
    #[inline]
    pub(crate) unsafe fn debug_validate(&self) {
        #[cfg(feature = "debug-invariants")]
        if let Err(err) = self.validate() {
            tracing::error!(%err, "red-black invariant violated");
            panic!("red-black invariant violated: {}", err);
        }
    }
}

impl Default for RbRoot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_node_is_red_and_unlinked() {
        let node = RbNode::default();
        assert!(node.is_red());
        assert!(node.parent().is_null());
        assert!(node.rb_left.is_null() && node.rb_right.is_null());
        assert!(!node.is_cleared());
    }

    #[test]
    fn test_set_color_keeps_parent() {
        let mut node = RbNode::new();
        let mut parent = RbNode::new();
        let parent_ptr = &mut parent as *mut RbNode;
        node.set_parent(parent_ptr);

        node.set_color(RbColor::Black);
        assert!(node.is_black());
        assert_eq!(node.parent(), parent_ptr);

        node.set_color(RbColor::Red);
        assert!(node.is_red());
        assert_eq!(node.parent(), parent_ptr);
    }

    #[test]
    fn test_set_parent_keeps_color() {
        let mut node = RbNode::new();
        let mut parent = RbNode::new();

        node.set_black();
        node.set_parent(&mut parent);
        assert_eq!(node.parent(), &mut parent as *mut RbNode);
        assert!(node.is_black());
        assert_eq!(node.__rb_parent_color & COLOR_MASK, RbColor::Black as usize);
    }

    #[test]
    fn test_root_empty_follows_link() {
        let mut root = RbRoot::default();
        assert!(root.is_empty());

        let mut n = RbNode::new();
        root.rb_node = &mut n;
        assert!(!root.is_empty());
        unsafe {
            assert!(root.is_linked(&n));
        }
    }

    #[test]
    fn test_set_parent_color_packs_both() {
        let mut node = RbNode::new();
        let mut parent = RbNode::new();
        let parent_ptr = &mut parent as *mut RbNode;

        node.set_parent_color(parent_ptr, RbColor::Black);
        assert_eq!(node.__rb_parent_color, parent_ptr as usize | 1);
        assert_eq!(node.parent(), parent_ptr);

        node.set_color(RbColor::Red);
        assert_eq!(node.__rb_parent_color, parent_ptr as usize);
        assert_eq!(node.parent(), parent_ptr);
    }

    #[test]
    fn test_set_black_from_red() {
        let mut node = RbNode::new();
        let mut parent = RbNode::new();
        node.set_parent_color(&mut parent, RbColor::Red);

        node.set_black();
        assert!(node.is_black());
        assert_eq!(node.parent(), &mut parent as *mut RbNode);
    }

    #[test]
    fn test_clear_marks_node() {
        let mut node = RbNode::new();
        assert!(!node.is_cleared());

        node.clear();
        assert!(node.is_cleared());
    }

    #[test]
    fn test_change_child_at_root() {
        let mut root = RbRoot::new();
        let mut a = RbNode::new();
        let mut b = RbNode::new();

        unsafe {
            root.change_child(&mut a, &mut b, ptr::null_mut());
        }
        assert_eq!(root.rb_node, &mut b as *mut RbNode);
    }
}
