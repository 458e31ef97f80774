//! C ABI adapter for the redwood red-black tree
//!
//! Exposes the `rb_*` entry points with `struct rb_node` / `struct rb_root`
//! layouts, so C callers can embed nodes in their own structs and drive the
//! tree exactly as they would a kernel-style rbtree.
//!
//! # Architecture
//!
//! ```text
//! C code
//!      ↓
//! redwood-capi (this crate) - translation boundary
//!      ↓
//! redwood-rbtree (pure Rust)
//! ```
//!
//! The adapter holds no logic of its own: pointers are handed through, C
//! callbacks are wrapped into the closures the core expects, and validation
//! results become errno values.
//!
//! ```c
//! struct item { int key; struct rb_node rb; };
//!
//! static bool item_less(const struct rb_node *a, const struct rb_node *b)
//! {
//!     return rb_entry(a, struct item, rb)->key < rb_entry(b, struct item, rb)->key;
//! }
//!
//! struct rb_root root = RB_ROOT;
//! rb_add(&root, &it->rb, item_less);
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(non_camel_case_types)]

pub mod error;
pub mod rbtree;

pub use error::result_to_errno;
pub use rbtree::{rb_node, rb_root, rb_root_cached};
