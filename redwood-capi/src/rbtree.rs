//! C red-black tree API adapter
//!
//! `rb_node`, `rb_root` and `rb_root_cached` are the core types under their
//! C names. The node layout is
//!
//! ```c
//! struct rb_node {
//!     uintptr_t __rb_parent_color;
//!     struct rb_node *rb_left;
//!     struct rb_node *rb_right;
//! };
//! ```

use core::ffi::c_void;
use core::ptr;

use libc::c_int;
use redwood_rbtree::RbColor;

use crate::error::result_to_errno;

pub use redwood_rbtree::RbNode as rb_node;
pub use redwood_rbtree::RbRoot as rb_root;
pub use redwood_rbtree::RbRootCached as rb_root_cached;

/// C-compatible color values
pub const RB_RED: u32 = 0;
pub const RB_BLACK: u32 = 1;

/// `a` sorts before `b`
pub type rb_less_fn_t = unsafe extern "C" fn(a: *const rb_node, b: *const rb_node) -> bool;

/// Order `key` against `node`: negative, zero or positive
pub type rb_compar_fn_t = unsafe extern "C" fn(key: *const c_void, node: *const rb_node) -> c_int;

#[inline]
fn ordering(cmp: c_int) -> core::cmp::Ordering {
    cmp.cmp(&0)
}

/// Color bit of `node` as `RB_RED`/`RB_BLACK`; a null child reads as black
///
/// # Safety
///
/// `node` must be null or point to an initialized `rb_node`
#[no_mangle]
pub unsafe extern "C" fn rb_color(node: *const rb_node) -> u32 {
    if node.is_null() {
        return RB_BLACK;
    }

    match (*node).color() {
        RbColor::Red => RB_RED,
        RbColor::Black => RB_BLACK,
    }
}

/// Paint `node` red, keeping its parent link. Null is ignored.
///
/// # Safety
///
/// `node` must be null or point to an initialized `rb_node`
#[no_mangle]
pub unsafe extern "C" fn rb_set_red(node: *mut rb_node) {
    if !node.is_null() {
        (*node).set_color(RbColor::Red);
    }
}

/// Paint `node` black, keeping its parent link. Null is ignored.
///
/// # Safety
///
/// `node` must be null or point to an initialized `rb_node`
#[no_mangle]
pub unsafe extern "C" fn rb_set_black(node: *mut rb_node) {
    if !node.is_null() {
        (*node).set_black();
    }
}

/// Parent of `node` with the color bit masked off; null for the root
/// and for a null `node`
///
/// # Safety
///
/// `node` must be null or point to an initialized `rb_node`
#[no_mangle]
pub unsafe extern "C" fn rb_parent(node: *const rb_node) -> *mut rb_node {
    if node.is_null() {
        return ptr::null_mut();
    }

    (*node).parent()
}

/// True when `root` holds no nodes; a null root counts as empty
///
/// # Safety
///
/// `root` must be null or point to an initialized `rb_root`
#[no_mangle]
pub unsafe extern "C" fn rb_empty(root: *const rb_root) -> bool {
    if root.is_null() {
        return true;
    }

    (*root).is_empty()
}

/// Link `node` as a red leaf at `link` below `parent`
///
/// # Safety
///
/// `link` must be an empty child slot of `parent`, or the root slot with a
/// null `parent`
#[no_mangle]
pub unsafe extern "C" fn rb_link_node(
    node: *mut rb_node,
    parent: *mut rb_node,
    link: *mut *mut rb_node,
) {
    (*node).link(parent, link);
}

/// Rebalance after [`rb_link_node`]
///
/// # Safety
///
/// `node` must have just been linked into `root`
#[no_mangle]
pub unsafe extern "C" fn rb_insert_color(root: *mut rb_root, node: *mut rb_node) {
    (*root).insert_color(node);
}

/// Remove `node` from `root`
///
/// # Safety
///
/// `node` must be a member of `root`
#[no_mangle]
pub unsafe extern "C" fn rb_erase(root: *mut rb_root, node: *mut rb_node) {
    (*root).erase(node);
}

/// Put `new` in `victim`'s place without rebalancing
///
/// # Safety
///
/// `victim` must be a member of `root`; `new` must sort identically and not
/// be linked anywhere
#[no_mangle]
pub unsafe extern "C" fn rb_replace_node(
    root: *mut rb_root,
    victim: *mut rb_node,
    new: *mut rb_node,
) {
    (*root).replace_node(victim, new);
}

/// Search for the slot of `node` with `less`, link it and rebalance
///
/// # Safety
///
/// `node` must not be linked anywhere; `less` must be a strict weak ordering
#[no_mangle]
pub unsafe extern "C" fn rb_add(root: *mut rb_root, node: *mut rb_node, less: rb_less_fn_t) {
    (*root).add(node, |a, b| less(a, b));
}

/// Find a node matching `key`, or null
///
/// # Safety
///
/// `root` must be a valid tree and `cmp` must accept `key`
#[no_mangle]
pub unsafe extern "C" fn rb_find(
    root: *const rb_root,
    key: *const c_void,
    cmp: rb_compar_fn_t,
) -> *mut rb_node {
    if root.is_null() {
        return ptr::null_mut();
    }
    (*root).find(&key, |key, node| ordering(cmp(*key, node)))
}

/// Smallest node, or null
///
/// # Safety
///
/// `root` must be a valid tree
#[no_mangle]
pub unsafe extern "C" fn rb_first(root: *const rb_root) -> *mut rb_node {
    if root.is_null() {
        return ptr::null_mut();
    }
    (*root).first()
}

/// Largest node, or null
///
/// # Safety
///
/// `root` must be a valid tree
#[no_mangle]
pub unsafe extern "C" fn rb_last(root: *const rb_root) -> *mut rb_node {
    if root.is_null() {
        return ptr::null_mut();
    }
    (*root).last()
}

/// In-order successor, or null
///
/// # Safety
///
/// `node` must be a tree member or a cleared node
#[no_mangle]
pub unsafe extern "C" fn rb_next(node: *const rb_node) -> *mut rb_node {
    rb_node::next(node)
}

/// In-order predecessor, or null
///
/// # Safety
///
/// `node` must be a tree member or a cleared node
#[no_mangle]
pub unsafe extern "C" fn rb_prev(node: *const rb_node) -> *mut rb_node {
    rb_node::prev(node)
}

/// First node of a postorder walk, or null
///
/// # Safety
///
/// `root` must be a valid tree
#[no_mangle]
pub unsafe extern "C" fn rb_first_postorder(root: *const rb_root) -> *mut rb_node {
    if root.is_null() {
        return ptr::null_mut();
    }
    (*root).first_postorder()
}

/// Postorder successor, or null
///
/// # Safety
///
/// `node` must be null or a tree member
#[no_mangle]
pub unsafe extern "C" fn rb_next_postorder(node: *const rb_node) -> *mut rb_node {
    rb_node::next_postorder(node)
}

/// [`rb_insert_color`] for a cached root; `leftmost` says whether the search
/// only went left
///
/// # Safety
///
/// Same as [`rb_insert_color`]
#[no_mangle]
pub unsafe extern "C" fn rb_insert_color_cached(
    root: *mut rb_root_cached,
    node: *mut rb_node,
    leftmost: bool,
) {
    (*root).insert_color_cached(node, leftmost);
}

/// [`rb_erase`] for a cached root. Returns the new leftmost node if `node`
/// was leftmost, null otherwise.
///
/// # Safety
///
/// Same as [`rb_erase`]
#[no_mangle]
pub unsafe extern "C" fn rb_erase_cached(
    root: *mut rb_root_cached,
    node: *mut rb_node,
) -> *mut rb_node {
    (*root).erase_cached(node)
}

/// [`rb_add`] for a cached root. Returns true if `node` is the new leftmost.
///
/// # Safety
///
/// Same as [`rb_add`]
#[no_mangle]
pub unsafe extern "C" fn rb_add_cached(
    root: *mut rb_root_cached,
    node: *mut rb_node,
    less: rb_less_fn_t,
) -> bool {
    (*root).add_cached(node, |a, b| less(a, b))
}

/// Smallest node of a cached root in O(1), or null
///
/// # Safety
///
/// `root` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn rb_first_cached(root: *const rb_root_cached) -> *mut rb_node {
    if root.is_null() {
        return ptr::null_mut();
    }
    (*root).first_cached()
}

/// Check the red-black invariants: 0 on success, `-EINVAL` on a violation
///
/// # Safety
///
/// `root` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn rb_validate(root: *const rb_root) -> c_int {
    if root.is_null() {
        return -libc::EINVAL;
    }
    result_to_errno((*root).validate())
}
