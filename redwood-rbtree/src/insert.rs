//! Insertion fixup
//!
//! Loop invariant: `node` is red. The only possible violation is a red
//! `node` under a red parent; each pass either pushes it two levels up
//! (uncle red) or removes it with at most two rotations.

use core::ptr;

use crate::augment::{NoAugment, RbAugment};
use crate::node::{RbColor, RbNode, RbRoot};

impl RbRoot {
    /// Rebalance the tree after `node` was linked as a red leaf.
    ///
    /// # Safety
    /// `node` must have just been linked into this tree with
    /// [`RbNode::link`] at the position an ordered search produced, and every
    /// other node of the tree must be valid.
    pub unsafe fn insert_color(&mut self, node: *mut RbNode) {
        self.insert_fixup(node, &NoAugment);
        self.debug_validate();
    }

    /// [`RbRoot::insert_color`] for augmented trees.
    ///
    /// The caller must have brought the aggregates on the path from the root
    /// down to `node` up to date before calling this; rotations are reported
    /// through `augment.rotate`.
    ///
    /// # Safety
    /// Same as [`RbRoot::insert_color`].
    pub unsafe fn insert_augmented<A>(&mut self, node: *mut RbNode, augment: &A)
    where
        A: RbAugment + ?Sized,
    {
        self.insert_fixup(node, augment);
        self.debug_validate();
    }

    unsafe fn insert_fixup<A>(&mut self, mut node: *mut RbNode, augment: &A)
    where
        A: RbAugment + ?Sized,
    {
        debug_assert!((*node).is_red(), "inserted node must be linked red");

        let mut parent = (*node).red_parent();

        loop {
            if parent.is_null() {
                // Reached the root
                (*node).set_parent_color(ptr::null_mut(), RbColor::Black);
                break;
            }

            if (*parent).is_black() {
                break;
            }

            // A red parent is never the root, so the grandparent exists and
            // is black.
            let gparent = (*parent).red_parent();
            let mut tmp = (*gparent).rb_right;

            if parent != tmp {
                // parent == gparent.rb_left
                if !tmp.is_null() && (*tmp).is_red() {
                    // Case 1: uncle is red. Flip colors, retry at gparent.
                    //
                    //       G            g
                    //      / \          / \
                    //     p   u  -->   P   U
                    //    /            /
                    //   n            n
                    (*tmp).set_parent_color(gparent, RbColor::Black);
                    (*parent).set_parent_color(gparent, RbColor::Black);
                    node = gparent;
                    parent = (*node).parent();
                    (*node).set_parent_color(parent, RbColor::Red);
                    continue;
                }

                tmp = (*parent).rb_right;
                if node == tmp {
                    // Case 2: node is the inner child. Rotate left at parent.
                    //
                    //      G             G
                    //     / \           / \
                    //    p   U  -->    n   U
                    //     \           /
                    //      n         p
                    tmp = (*node).rb_left;
                    (*parent).rb_right = tmp;
                    (*node).rb_left = parent;
                    if !tmp.is_null() {
                        (*tmp).set_parent_color(parent, RbColor::Black);
                    }
                    (*parent).set_parent_color(node, RbColor::Red);
                    augment.rotate(parent, node);
                    parent = node;
                    tmp = (*node).rb_right;
                }

                // Case 3: node is the outer child. Rotate right at gparent.
                //
                //        G           P
                //       / \         / \
                //      p   U  -->  n   g
                //     /                 \
                //    n                   U
                (*gparent).rb_left = tmp;
                (*parent).rb_right = gparent;
                if !tmp.is_null() {
                    (*tmp).set_parent_color(gparent, RbColor::Black);
                }
                self.rotate_set_parents(gparent, parent, RbColor::Red);
                augment.rotate(gparent, parent);
                break;
            } else {
                // parent == gparent.rb_right
                tmp = (*gparent).rb_left;
                if !tmp.is_null() && (*tmp).is_red() {
                    // Case 1, mirrored
                    (*tmp).set_parent_color(gparent, RbColor::Black);
                    (*parent).set_parent_color(gparent, RbColor::Black);
                    node = gparent;
                    parent = (*node).parent();
                    (*node).set_parent_color(parent, RbColor::Red);
                    continue;
                }

                tmp = (*parent).rb_left;
                if node == tmp {
                    // Case 2, mirrored: rotate right at parent
                    tmp = (*node).rb_right;
                    (*parent).rb_left = tmp;
                    (*node).rb_right = parent;
                    if !tmp.is_null() {
                        (*tmp).set_parent_color(parent, RbColor::Black);
                    }
                    (*parent).set_parent_color(node, RbColor::Red);
                    augment.rotate(parent, node);
                    parent = node;
                    tmp = (*node).rb_left;
                }

                // Case 3, mirrored: rotate left at gparent
                (*gparent).rb_right = tmp;
                (*parent).rb_left = gparent;
                if !tmp.is_null() {
                    (*tmp).set_parent_color(gparent, RbColor::Black);
                }
                self.rotate_set_parents(gparent, parent, RbColor::Red);
                augment.rotate(gparent, parent);
                break;
            }
        }
    }
}
