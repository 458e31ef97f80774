//! Shared fixtures for the integration tests

#![allow(dead_code)]

use redwood_rbtree::{rb_entry, RbNode, RbRoot};
use std::ptr;

pub struct Item {
    pub key: u32,
    pub rb: RbNode,
}

/// Records at stable addresses; the vector is never resized after creation.
pub fn items(keys: &[u32]) -> Vec<Item> {
    keys.iter()
        .map(|&key| Item {
            key,
            rb: RbNode::new(),
        })
        .collect()
}

pub unsafe fn key(node: *const RbNode) -> u32 {
    (*rb_entry!(node, Item, rb)).key
}

pub unsafe fn node(items: &mut [Item], i: usize) -> *mut RbNode {
    ptr::addr_of_mut!((*items.as_mut_ptr().add(i)).rb)
}

pub unsafe fn less(a: *const RbNode, b: *const RbNode) -> bool {
    key(a) < key(b)
}

pub unsafe fn insert(root: &mut RbRoot, items: &mut [Item], i: usize) {
    root.add(node(items, i), |a, b| less(a, b));
}

pub unsafe fn keys(root: &RbRoot) -> Vec<u32> {
    root.iter().map(|n| key(n)).collect()
}

/// Full check: red-black invariants, ordering and expected size.
pub fn check(root: &RbRoot, expected_len: usize) {
    let count = root
        .validate_by(|a, b| unsafe { key(a) <= key(b) })
        .unwrap();
    assert_eq!(count, expected_len);
}
