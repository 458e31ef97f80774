//! Whole-tree validation after every C-side mutation
//!
//! Only built with `--features debug-invariants`.

#![cfg(feature = "debug-invariants")]

use libc::c_int;
use memoffset::offset_of;
use redwood_capi::rbtree::{rb_add, rb_erase, rb_validate};
use redwood_capi::{rb_node, rb_root};
use std::ptr;

#[repr(C)]
struct Item {
    key: c_int,
    rb: rb_node,
}

unsafe fn item_key(node: *const rb_node) -> c_int {
    (*((node as *const u8).sub(offset_of!(Item, rb)) as *const Item)).key
}

unsafe extern "C" fn item_less(a: *const rb_node, b: *const rb_node) -> bool {
    item_key(a) < item_key(b)
}

fn items(keys: &[c_int]) -> Vec<Item> {
    keys.iter()
        .map(|&key| Item {
            key,
            rb: rb_node::new(),
        })
        .collect()
}

#[test]
fn test_valid_tree_passes_every_check() {
    let mut items = items(&[5, 1, 4, 2, 3]);
    let mut root = rb_root::new();
    unsafe {
        for item in items.iter_mut() {
            rb_add(&mut root, &mut item.rb, item_less);
        }
        for item in items.iter_mut() {
            rb_erase(&mut root, &mut item.rb);
        }
        assert_eq!(rb_validate(&root), 0);
    }
}

#[test]
#[should_panic(expected = "red-black invariant violated")]
fn test_rb_erase_on_corrupted_tree_panics() {
    let mut items = items(&[1, 2, 3, 4, 5]);
    let mut root = rb_root::new();
    unsafe {
        for item in items.iter_mut() {
            rb_add(&mut root, &mut item.rb, item_less);
        }
        (*root.rb_node).rb_left = ptr::null_mut();
        rb_erase(&mut root, &mut items[4].rb);
    }
}

#[test]
#[should_panic(expected = "red-black invariant violated")]
fn test_rb_add_on_corrupted_tree_panics() {
    let mut items = items(&[1, 2, 3, 4, 5, 6]);
    let mut root = rb_root::new();
    unsafe {
        for item in items[..5].iter_mut() {
            rb_add(&mut root, &mut item.rb, item_less);
        }
        (*root.rb_node).rb_left = ptr::null_mut();
        rb_add(&mut root, &mut items[5].rb, item_less);
    }
}
