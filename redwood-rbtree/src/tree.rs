//! Typed intrusive tree
//!
//! [`RbTree`] wraps an [`RbRootCached`] for one record type. Records embed an
//! [`RbNode`] and implement [`RbLinked`] (usually via [`impl_rb_linked!`]);
//! the tree converts between records and nodes so callers compare records,
//! not raw nodes. Augmentation callbacks are supplied once, at construction,
//! and every mutation uses them.
//!
//! The tree still does not own its records. Linking a record is `unsafe`:
//! the record must stay put and alive until it is removed.
//!
//! [`impl_rb_linked!`]: crate::impl_rb_linked

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::augment::{NoAugment, RbAugment};
use crate::cached::RbRootCached;
use crate::error::{RbError, RbResult};
use crate::node::RbNode;
use crate::traverse::Iter;

/// A record type that embeds an [`RbNode`].
///
/// # Safety
/// `node_offset` must return the byte offset of an `RbNode` field inside
/// `Self`.
pub unsafe trait RbLinked: Sized {
    fn node_offset() -> usize;

    /// Pointer to the embedded node.
    #[inline]
    fn as_node(this: NonNull<Self>) -> *mut RbNode {
        (this.as_ptr() as *mut u8).wrapping_add(Self::node_offset()) as *mut RbNode
    }

    /// Record that embeds `node`.
    ///
    /// # Safety
    /// `node` must be non-null and embedded in a `Self`.
    #[inline]
    unsafe fn from_node(node: *mut RbNode) -> NonNull<Self> {
        NonNull::new_unchecked((node as *mut u8).wrapping_sub(Self::node_offset()) as *mut Self)
    }
}

/// Implement [`RbLinked`] for a record using one of its [`RbNode`] fields.
///
/// ```
/// use redwood_rbtree::{impl_rb_linked, RbNode};
///
/// struct Timer {
///     expires: u64,
///     node: RbNode,
/// }
/// impl_rb_linked!(Timer, node);
/// ```
#[macro_export]
macro_rules! impl_rb_linked {
    ($type:path, $member:ident) => {
        unsafe impl $crate::RbLinked for $type {
            #[inline]
            fn node_offset() -> usize {
                $crate::__memoffset::offset_of!($type, $member)
            }
        }
    };
}

/// Intrusive red-black tree of `T` records
///
/// Keeps the leftmost record cached, so [`RbTree::first`] is O(1).
pub struct RbTree<T: RbLinked, A: RbAugment = NoAugment> {
    root: RbRootCached,
    len: usize,
    augment: A,
    _marker: PhantomData<*const T>,
}

impl<T: RbLinked> RbTree<T, NoAugment> {
    pub const fn new() -> Self {
        Self::with_augment(NoAugment)
    }
}

impl<T: RbLinked> Default for RbTree<T, NoAugment> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RbLinked, A: RbAugment> RbTree<T, A> {
    /// Create an empty tree whose mutations run `augment`'s hooks.
    pub const fn with_augment(augment: A) -> Self {
        Self {
            root: RbRootCached::new(),
            len: 0,
            augment,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn augment(&self) -> &A {
        &self.augment
    }

    /// Insert `elem`, ordered by `less`.
    ///
    /// Records comparing equal to existing ones go after them. Returns true
    /// if `elem` is the new first record.
    ///
    /// # Safety
    /// `elem` must not be linked into any tree. It must stay valid and must
    /// not move until it is removed (or the tree is cleared), and must not be
    /// mutated through other paths while linked, except for fields the tree
    /// never reads.
    pub unsafe fn insert<F>(&mut self, elem: NonNull<T>, mut less: F) -> bool
    where
        F: FnMut(&T, &T) -> bool,
    {
        let node = T::as_node(elem);
        let (parent, link, leftmost) = self.root.rb_root.descend(node, |a, b| {
            less(
                T::from_node(a as *mut RbNode).as_ref(),
                T::from_node(b as *mut RbNode).as_ref(),
            )
        });
        (*node).link(parent, link);

        // Bring the new leaf and its ancestors up to date before any rotation
        self.augment.propagate(node, parent);
        self.augment.propagate(parent, ptr::null_mut());

        self.root
            .insert_augmented_cached(node, leftmost, &self.augment);
        self.len += 1;
        leftmost
    }

    /// Unlink `elem` and mark it cleared.
    ///
    /// # Safety
    /// `elem` must be linked into this tree.
    pub unsafe fn remove(&mut self, elem: NonNull<T>) {
        let node = T::as_node(elem);
        self.root.erase_augmented_cached(node, &self.augment);
        (*node).clear();
        self.len -= 1;
    }

    /// Find a record matching `key`. With duplicates, any match may be
    /// returned.
    pub fn find<K, F>(&self, key: &K, mut compare: F) -> Option<&T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> Ordering,
    {
        let node = self
            .root
            .rb_root
            .find(key, |k, n| compare(k, unsafe { Self::record(n) }));
        self.to_record(node)
    }

    /// Top of the tree, the starting point for augmented searches.
    pub fn root(&self) -> Option<&T> {
        self.to_record(self.root.rb_root.rb_node)
    }

    pub fn first(&self) -> Option<&T> {
        self.to_record(self.root.first_cached())
    }

    pub fn last(&self) -> Option<&T> {
        self.to_record(self.root.rb_root.last())
    }

    /// Record after `elem` in order.
    ///
    /// # Safety
    /// `elem` must be linked into this tree.
    pub unsafe fn next(&self, elem: &T) -> Option<&T> {
        self.to_record(RbNode::next(T::as_node(NonNull::from(elem))))
    }

    /// Record before `elem` in order.
    ///
    /// # Safety
    /// `elem` must be linked into this tree.
    pub unsafe fn prev(&self, elem: &T) -> Option<&T> {
        self.to_record(RbNode::prev(T::as_node(NonNull::from(elem))))
    }

    /// Ascending iteration over the records.
    pub fn iter(&self) -> TreeIter<'_, T> {
        TreeIter {
            inner: self.root.rb_root.iter(),
            _marker: PhantomData,
        }
    }

    /// Unlink every record, leaving each one cleared. No rebalancing is done
    /// and the records' memory is otherwise untouched.
    pub fn clear(&mut self) {
        for node in self.root.rb_root.postorder() {
            // Safety: the postorder walk has already moved past `node`
            unsafe { (*node).clear() };
        }
        self.root = RbRootCached::new();
        self.len = 0;
        tracing::debug!("tree cleared");
    }

    /// Check the red-black invariants and that the walk found exactly
    /// [`RbTree::len`] records; returns the record count.
    pub fn validate(&self) -> RbResult<usize> {
        let count = self.root.rb_root.validate()?;
        if count != self.len {
            return Err(RbError::LengthMismatch {
                expected: self.len,
                found: count,
            });
        }
        Ok(count)
    }

    /// Check the invariants and that `less` never goes backwards.
    pub fn validate_by<F>(&self, mut less: F) -> RbResult<usize>
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.root.rb_root.validate_by(|prev, node| unsafe {
            !less(Self::record(node), Self::record(prev))
        })
    }

    #[inline]
    unsafe fn record<'a>(node: *const RbNode) -> &'a T {
        T::from_node(node as *mut RbNode).as_ref()
    }

    #[inline]
    fn to_record(&self, node: *mut RbNode) -> Option<&T> {
        if node.is_null() {
            None
        } else {
            // Safety: non-null nodes of this tree are embedded in live `T`s
            Some(unsafe { Self::record(node) })
        }
    }
}

impl<T: RbLinked, A: RbAugment> fmt::Debug for RbTree<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len)
            .field("root", &self.root.rb_root.rb_node)
            .finish()
    }
}

/// Ascending iterator over the records of an [`RbTree`].
pub struct TreeIter<'a, T> {
    inner: Iter<'a>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T: RbLinked> Iterator for TreeIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner
            .next()
            .map(|node| unsafe { T::from_node(node).as_ref() })
    }
}

impl<'a, T: RbLinked, A: RbAugment> IntoIterator for &'a RbTree<T, A> {
    type Item = &'a T;
    type IntoIter = TreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rb_declare_callbacks_max;

    struct Job {
        prio: u32,
        id: u32,
        rb: RbNode,
    }
    impl_rb_linked!(Job, rb);

    fn job(prio: u32, id: u32) -> Job {
        Job {
            prio,
            id,
            rb: RbNode::new(),
        }
    }

    fn by_prio(a: &Job, b: &Job) -> bool {
        a.prio < b.prio
    }

    #[test]
    fn test_node_offset_round_trip() {
        let mut j = job(1, 1);
        let elem = NonNull::from(&mut j);
        let node = Job::as_node(elem);
        assert_eq!(node, &mut j.rb as *mut RbNode);
        assert_eq!(unsafe { Job::from_node(node) }, NonNull::from(&mut j));
    }

    #[test]
    fn test_insert_find_remove() {
        let mut jobs: Vec<Job> = [5, 1, 9, 3, 7].iter().map(|&p| job(p, p * 10)).collect();
        let mut tree: RbTree<Job> = RbTree::new();
        assert!(tree.is_empty());

        unsafe {
            for j in jobs.iter_mut() {
                tree.insert(NonNull::from(j), by_prio);
            }
        }
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.validate(), Ok(5));
        assert_eq!(tree.iter().map(|j| j.prio).collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
        assert_eq!(tree.first().map(|j| j.prio), Some(1));
        assert_eq!(tree.last().map(|j| j.prio), Some(9));

        let hit = tree.find(&7u32, |k, j| k.cmp(&j.prio));
        assert_eq!(hit.map(|j| j.id), Some(70));
        assert!(tree.find(&4u32, |k, j| k.cmp(&j.prio)).is_none());

        unsafe {
            // jobs[1] has prio 1, the current first
            tree.remove(NonNull::from(&mut jobs[1]));
        }
        assert!(jobs[1].rb.is_cleared());
        assert_eq!(tree.first().map(|j| j.prio), Some(3));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.validate_by(by_prio), Ok(4));
    }

    #[test]
    fn test_next_prev() {
        let mut jobs: Vec<Job> = (0..10).map(|i| job(i, i)).collect();
        let mut tree: RbTree<Job> = RbTree::new();
        unsafe {
            for j in jobs.iter_mut().rev() {
                tree.insert(NonNull::from(j), by_prio);
            }
            let five = tree.find(&5u32, |k, j| k.cmp(&j.prio)).unwrap();
            assert_eq!(tree.next(five).map(|j| j.prio), Some(6));
            assert_eq!(tree.prev(five).map(|j| j.prio), Some(4));

            let last = tree.last().unwrap();
            assert!(tree.next(last).is_none());
        }
    }

    #[test]
    fn test_insert_reports_new_first() {
        let mut jobs = [job(4, 0), job(2, 1), job(3, 2), job(2, 3)];
        let mut tree: RbTree<Job> = RbTree::new();
        let firsts: Vec<bool> = jobs
            .iter_mut()
            .map(|j| unsafe { tree.insert(NonNull::from(j), by_prio) })
            .collect();
        // An equal key goes after the existing one, so it is not first.
        assert_eq!(firsts, vec![true, true, false, false]);
        assert_eq!(tree.first().map(|j| j.id), Some(1));
    }

    #[test]
    fn test_clear_unlinks_everything() {
        let mut jobs: Vec<Job> = (0..16).map(|i| job(i, i)).collect();
        let mut tree: RbTree<Job> = RbTree::new();
        unsafe {
            for j in jobs.iter_mut() {
                tree.insert(NonNull::from(j), by_prio);
            }
        }
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.first().is_none());
        assert!(jobs.iter().all(|j| j.rb.is_cleared()));

        // Cleared records can be linked again.
        unsafe {
            tree.insert(NonNull::from(&mut jobs[3]), by_prio);
        }
        assert_eq!(tree.validate(), Ok(1));
    }

    #[test]
    fn test_validate_reports_len_mismatch() {
        let mut jobs: Vec<Job> = (0..3).map(|i| job(i, i)).collect();
        let mut tree: RbTree<Job> = RbTree::new();
        unsafe {
            for j in jobs.iter_mut() {
                tree.insert(NonNull::from(j), by_prio);
            }
        }
        assert_eq!(tree.validate(), Ok(3));

        tree.len = 5;
        assert_eq!(
            tree.validate(),
            Err(RbError::LengthMismatch {
                expected: 5,
                found: 3,
            })
        );
    }

    #[cfg(feature = "debug-invariants")]
    #[test]
    #[should_panic(expected = "red-black invariant violated")]
    fn test_remove_validates_whole_tree() {
        let mut jobs: Vec<Job> = (1..=5).map(|i| job(i, i)).collect();
        let mut tree: RbTree<Job> = RbTree::new();
        unsafe {
            for j in jobs.iter_mut() {
                tree.insert(NonNull::from(j), by_prio);
            }
            (*tree.root.rb_root.rb_node).rb_left = ptr::null_mut();
            tree.remove(NonNull::from(&mut jobs[4]));
        }
    }

    struct Range {
        start: u32,
        end: u32,
        max_end: u32,
        rb: RbNode,
    }

    rb_declare_callbacks_max!(RangeMax, Range, rb, max_end, |r: &Range| r.end);
    impl_rb_linked!(Range, rb);

    fn subtree_max(node: *const RbNode) -> u32 {
        if node.is_null() {
            return 0;
        }
        unsafe {
            let r = <Range as RbLinked>::from_node(node as *mut RbNode).as_ref();
            r.end
                .max(subtree_max(r.rb.rb_left))
                .max(subtree_max(r.rb.rb_right))
        }
    }

    fn check_max(tree: &RbTree<Range, RangeMax>) {
        for r in tree {
            assert_eq!(r.max_end, subtree_max(&r.rb), "stale max at start {}", r.start);
        }
    }

    #[test]
    fn test_augmented_tree_keeps_max() {
        let mut ranges: Vec<Range> = (0..64u32)
            .map(|i| {
                let start = (i * 37) % 64;
                Range {
                    start,
                    end: start + (i * 13) % 17,
                    max_end: 0,
                    rb: RbNode::new(),
                }
            })
            .collect();

        let mut tree = RbTree::with_augment(RangeMax);
        unsafe {
            for r in ranges.iter_mut() {
                tree.insert(NonNull::from(r), |a: &Range, b: &Range| a.start < b.start);
                check_max(&tree);
            }
            for r in ranges.iter_mut().step_by(3) {
                tree.remove(NonNull::from(r));
                check_max(&tree);
            }
        }
        assert_eq!(tree.validate(), Ok(64 - 22));
        assert_eq!(
            tree.root().map(|r| r.max_end),
            Some(tree.iter().map(|r| r.end).max().unwrap())
        );
    }
}
