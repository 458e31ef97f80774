//! Erase: unlink, then rebalance
//!
//! Unlinking moves at most one node (the in-order successor) and reports
//! where a black node went missing. Rebalancing then walks up from that
//! point until the missing black is restored.

use core::ptr;

use crate::augment::{NoAugment, RbAugment};
use crate::node::{RbColor, RbNode, RbRoot, COLOR_MASK};

impl RbRoot {
    /// Remove `node` from the tree.
    ///
    /// The node's memory is left as is; the caller owns it again and must
    /// re-link it before inserting it anywhere.
    ///
    /// # Safety
    /// `node` must currently be a member of this tree and all members must be
    /// valid. Erasing a node that is not linked (or erasing it twice) is
    /// undefined behavior; debug builds panic on it.
    pub unsafe fn erase(&mut self, node: *mut RbNode) {
        self.erase_augmented(node, &NoAugment);
    }

    /// [`RbRoot::erase`] for augmented trees.
    ///
    /// # Safety
    /// Same as [`RbRoot::erase`].
    pub unsafe fn erase_augmented<A>(&mut self, node: *mut RbNode, augment: &A)
    where
        A: RbAugment + ?Sized,
    {
        debug_assert!(
            self.is_linked(node),
            "erase of a node that is not linked into this tree"
        );

        let rebalance = self.unlink(node, augment);
        if !rebalance.is_null() {
            self.erase_rebalance(rebalance, augment);
        }
        self.debug_validate();
    }

    /// Take `node` out of the tree structure.
    ///
    /// Returns the parent of the spot that lost a black node, or null when
    /// no rebalance is needed.
    unsafe fn unlink<A>(&mut self, node: *mut RbNode, augment: &A) -> *mut RbNode
    where
        A: RbAugment + ?Sized,
    {
        let child = (*node).rb_right;
        let mut tmp = (*node).rb_left;
        let parent: *mut RbNode;
        let rebalance: *mut RbNode;

        if tmp.is_null() {
            // At most one child, on the right. A lone child is red and hangs
            // below a black node (otherwise black heights would differ), so
            // it simply takes over node's parent and color.
            let pc = (*node).__rb_parent_color;
            parent = (pc & !COLOR_MASK) as *mut RbNode;
            self.change_child(node, child, parent);
            if !child.is_null() {
                (*child).__rb_parent_color = pc;
                rebalance = ptr::null_mut();
            } else if pc & COLOR_MASK == RbColor::Black as usize {
                rebalance = parent;
            } else {
                rebalance = ptr::null_mut();
            }
            tmp = parent;
        } else if child.is_null() {
            // Only a left child; same reasoning as above
            let pc = (*node).__rb_parent_color;
            (*tmp).__rb_parent_color = pc;
            parent = (pc & !COLOR_MASK) as *mut RbNode;
            self.change_child(node, tmp, parent);
            rebalance = ptr::null_mut();
            tmp = parent;
        } else {
            // Two children: the successor (leftmost of the right subtree)
            // takes node's place and color.
            let mut successor = child;
            let mut successor_parent = child;
            let child2;

            tmp = (*child).rb_left;
            if tmp.is_null() {
                // The right child is the successor.
                //
                //     (n)          (s)
                //     / \          / \
                //   (x) (s)  ->  (x) (c)
                //         \
                //         (c)
                child2 = (*successor).rb_right;
                augment.copy(node, successor);
            } else {
                // The successor is the leftmost node below the right child.
                //
                //     (n)          (s)
                //     / \          / \
                //   (x) (y)  ->  (x) (y)
                //       /            /
                //     (p)          (p)
                //     /            /
                //   (s)          (c)
                //     \
                //     (c)
                loop {
                    successor_parent = successor;
                    successor = tmp;
                    tmp = (*tmp).rb_left;
                    if tmp.is_null() {
                        break;
                    }
                }
                child2 = (*successor).rb_right;
                (*successor_parent).rb_left = child2;
                (*successor).rb_right = child;
                (*child).set_parent(successor);
                augment.copy(node, successor);
                augment.propagate(successor_parent, successor);
            }
            parent = successor_parent;

            tmp = (*node).rb_left;
            (*successor).rb_left = tmp;
            (*tmp).set_parent(successor);

            let pc = (*node).__rb_parent_color;
            tmp = (pc & !COLOR_MASK) as *mut RbNode;
            self.change_child(node, successor, tmp);

            if !child2.is_null() {
                // child2 was the red only child of the successor
                (*child2).set_parent_color(parent, RbColor::Black);
                rebalance = ptr::null_mut();
            } else if (*successor).is_black() {
                rebalance = parent;
            } else {
                rebalance = ptr::null_mut();
            }
            (*successor).__rb_parent_color = pc;
            tmp = successor;
        }

        augment.propagate(tmp, ptr::null_mut());
        rebalance
    }

    /// Restore black heights below `parent`, whose child on one side (the
    /// `node` below, null on the first pass) is one black short.
    ///
    /// Loop invariants:
    /// - `node` is black (or null on the first iteration)
    /// - `node` is not the root (`parent` is not null)
    /// - all paths through `parent` and `node` have one black node fewer than
    ///   the other paths
    unsafe fn erase_rebalance<A>(&mut self, mut parent: *mut RbNode, augment: &A)
    where
        A: RbAugment + ?Sized,
    {
        let mut node: *mut RbNode = ptr::null_mut();

        loop {
            let mut sibling = (*parent).rb_right;

            if node != sibling {
                // node == parent.rb_left
                if (*sibling).is_red() {
                    // Case 1: red sibling. Rotate left at parent so node gets
                    // a black sibling.
                    //
                    //     P               S
                    //    / \             / \
                    //   N   s    -->    p   Sr
                    //      / \         / \
                    //     Sl  Sr      N   Sl
                    let tmp1 = (*sibling).rb_left;
                    (*parent).rb_right = tmp1;
                    (*sibling).rb_left = parent;
                    (*tmp1).set_parent_color(parent, RbColor::Black);
                    self.rotate_set_parents(parent, sibling, RbColor::Red);
                    augment.rotate(parent, sibling);
                    sibling = tmp1;
                }

                let mut tmp1 = (*sibling).rb_right;
                if tmp1.is_null() || (*tmp1).is_black() {
                    let tmp2 = (*sibling).rb_left;
                    if tmp2.is_null() || (*tmp2).is_black() {
                        // Case 2: black sibling with black children. Paint
                        // the sibling red; a red parent absorbs the deficit,
                        // a black one moves it up a level.
                        //
                        //    (p)           (p)
                        //    / \           / \
                        //   N   S    -->  N   s
                        //      / \           / \
                        //     Sl  Sr        Sl  Sr
                        (*sibling).set_parent_color(parent, RbColor::Red);
                        if (*parent).is_red() {
                            (*parent).set_black();
                        } else {
                            node = parent;
                            parent = (*node).parent();
                            if !parent.is_null() {
                                continue;
                            }
                        }
                        break;
                    }

                    // Case 3: black sibling, outer nephew black, inner nephew
                    // red. Rotate right at sibling; the red nephew becomes
                    // the new sibling with a red outer child.
                    //
                    //   (p)           (p)
                    //   / \           / \
                    //  N   S    -->  N   sl
                    //     / \             \
                    //    sl  Sr            S
                    //                       \
                    //                        Sr
                    tmp1 = (*tmp2).rb_right;
                    (*sibling).rb_left = tmp1;
                    (*tmp2).rb_right = sibling;
                    (*parent).rb_right = tmp2;
                    if !tmp1.is_null() {
                        (*tmp1).set_parent_color(sibling, RbColor::Black);
                    }
                    augment.rotate(sibling, tmp2);
                    tmp1 = sibling;
                    sibling = tmp2;
                }

                // Case 4: black sibling with red outer nephew. Rotate left at
                // parent; the sibling takes the parent's color, parent and
                // outer nephew turn black. Done.
                //
                //      (p)             (s)
                //      / \             / \
                //     N   S     -->   P   Sr
                //        / \         / \
                //      (sl) sr      N  (sl)
                let tmp2 = (*sibling).rb_left;
                (*parent).rb_right = tmp2;
                (*sibling).rb_left = parent;
                (*tmp1).set_parent_color(sibling, RbColor::Black);
                if !tmp2.is_null() {
                    (*tmp2).set_parent(parent);
                }
                self.rotate_set_parents(parent, sibling, RbColor::Black);
                augment.rotate(parent, sibling);
                break;
            } else {
                // node == parent.rb_right
                sibling = (*parent).rb_left;
                if (*sibling).is_red() {
                    // Case 1, mirrored: rotate right at parent
                    let tmp1 = (*sibling).rb_right;
                    (*parent).rb_left = tmp1;
                    (*sibling).rb_right = parent;
                    (*tmp1).set_parent_color(parent, RbColor::Black);
                    self.rotate_set_parents(parent, sibling, RbColor::Red);
                    augment.rotate(parent, sibling);
                    sibling = tmp1;
                }

                let mut tmp1 = (*sibling).rb_left;
                if tmp1.is_null() || (*tmp1).is_black() {
                    let tmp2 = (*sibling).rb_right;
                    if tmp2.is_null() || (*tmp2).is_black() {
                        // Case 2, mirrored
                        (*sibling).set_parent_color(parent, RbColor::Red);
                        if (*parent).is_red() {
                            (*parent).set_black();
                        } else {
                            node = parent;
                            parent = (*node).parent();
                            if !parent.is_null() {
                                continue;
                            }
                        }
                        break;
                    }

                    // Case 3, mirrored: rotate left at sibling
                    tmp1 = (*tmp2).rb_left;
                    (*sibling).rb_right = tmp1;
                    (*tmp2).rb_left = sibling;
                    (*parent).rb_left = tmp2;
                    if !tmp1.is_null() {
                        (*tmp1).set_parent_color(sibling, RbColor::Black);
                    }
                    augment.rotate(sibling, tmp2);
                    tmp1 = sibling;
                    sibling = tmp2;
                }

                // Case 4, mirrored: rotate right at parent
                let tmp2 = (*sibling).rb_right;
                (*parent).rb_left = tmp2;
                (*sibling).rb_right = parent;
                (*tmp1).set_parent_color(sibling, RbColor::Black);
                if !tmp2.is_null() {
                    (*tmp2).set_parent(parent);
                }
                self.rotate_set_parents(parent, sibling, RbColor::Black);
                augment.rotate(parent, sibling);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{add_all, items, key, keys, node};
    use crate::RbRoot;

    #[test]
    fn test_erase_only_node_empties_tree() {
        let mut items = items(&[10]);
        let mut root = RbRoot::new();
        unsafe {
            add_all(&mut root, &mut items);
            root.erase(node(&mut items, 0));
        }
        assert!(root.is_empty());
    }

    #[test]
    fn test_erase_leftmost_of_three() {
        let mut items = items(&[10, 20, 30]);
        let mut root = RbRoot::new();
        unsafe {
            add_all(&mut root, &mut items);
            root.erase(node(&mut items, 0));

            let top = root.rb_node;
            assert_eq!(key(top), 20);
            assert!((*top).is_black());
            assert!((*top).rb_left.is_null());
            assert_eq!(key((*top).rb_right), 30);
            assert_eq!(root.validate(), Ok(2));
        }
    }

    #[test]
    fn test_erase_two_child_root_uses_successor() {
        let mut items = items(&[20, 10, 30, 25, 35]);
        let mut root = RbRoot::new();
        unsafe {
            add_all(&mut root, &mut items);
            root.erase(node(&mut items, 0));

            assert_eq!(key(root.rb_node), 25);
            assert_eq!(keys(&root), vec![10, 25, 30, 35]);
            assert_eq!(root.validate(), Ok(4));
        }
    }

    #[test]
    fn test_erase_black_leaf_rebalances_both_sides() {
        let keys_in: Vec<u32> = (0..32).collect();

        // Ascending removal keeps hitting left-side deficits, descending
        // removal right-side ones.
        for descending in [false, true] {
            let mut items = items(&keys_in);
            let mut root = RbRoot::new();
            unsafe {
                add_all(&mut root, &mut items);
                for step in 0..keys_in.len() {
                    let i = if descending {
                        keys_in.len() - 1 - step
                    } else {
                        step
                    };
                    root.erase(node(&mut items, i));
                    assert_eq!(root.validate(), Ok(keys_in.len() - step - 1));
                }
            }
            assert!(root.is_empty());
        }
    }

    #[test]
    fn test_erase_keeps_node_memory() {
        let mut items = items(&[1, 2, 3]);
        let mut root = RbRoot::new();
        unsafe {
            add_all(&mut root, &mut items);
            root.erase(node(&mut items, 1));
        }
        assert_eq!(items[1].key, 2);
    }

    #[cfg(feature = "debug-invariants")]
    #[test]
    #[should_panic(expected = "red-black invariant violated")]
    fn test_erase_validates_whole_tree() {
        // 2 on top, 1 on the left, 4 (with red 3 and 5) on the right
        let mut items = items(&[1, 2, 3, 4, 5]);
        let mut root = RbRoot::new();
        unsafe {
            add_all(&mut root, &mut items);
            assert_eq!(root.validate(), Ok(5));

            // Drop the left subtree behind the tree's back
            (*root.rb_node).rb_left = core::ptr::null_mut();
            root.erase(node(&mut items, 4));
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "erase of a node that is not linked into this tree")]
    fn test_double_erase_panics_in_debug() {
        let mut items = items(&[1, 2, 3, 4]);
        let mut root = RbRoot::new();
        unsafe {
            add_all(&mut root, &mut items);
            root.erase(node(&mut items, 3));
            root.erase(node(&mut items, 3));
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "erase of a node that is not linked into this tree")]
    fn test_erase_unlinked_node_panics_in_debug() {
        let mut items = items(&[1, 2]);
        let mut root = RbRoot::new();
        unsafe {
            root.add(node(&mut items, 0), |a, b| key(a) < key(b));
            root.erase(node(&mut items, 1));
        }
    }
}
