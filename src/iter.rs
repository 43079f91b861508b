//! Ascending traversal over an [`OrderedSet`], plus the trait surface
//! built on it (`IntoIterator`, `FromIterator`, `Extend`, `Debug`,
//! equality).
//!
//! Both iterators walk the tree in-order with an explicit stack: push
//! the left spine, pop and yield, descend right. The stack depth is
//! bounded by the tree height, so it lives inline for all but large
//! sets and never grows past O(log n).

use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::{Arena, NIL};
use crate::set::OrderedSet;

/// In-order traversal state. Covers a height of 16 without heap
/// allocation, which fits any set of a few hundred elements.
type Spine = SmallVec<[usize; 16]>;

/// Borrowing iterator over an [`OrderedSet`], ascending.
///
/// Created by [`OrderedSet::iter`]. Yields `&T` in strictly increasing
/// order and may be dropped before exhaustion.
pub struct Iter<'a, T> {
    set: &'a OrderedSet<T>,
    stack: Spine,
    /// Subtree whose left spine is pushed next; `NIL` when the walk
    /// only has stacked ancestors left to visit.
    next: usize,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(set: &'a OrderedSet<T>) -> Self {
        Self {
            set,
            stack: Spine::new(),
            next: set.root,
            remaining: set.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let mut cur = self.next;
        while cur != NIL {
            self.stack.push(cur);
            cur = self.set.arena.get(cur).left;
        }
        let idx = self.stack.pop()?;
        let node = self.set.arena.get(idx);
        self.next = node.right;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            set: self.set,
            stack: self.stack.clone(),
            next: self.next,
            remaining: self.remaining,
        }
    }
}

/// Owning iterator over an [`OrderedSet`], ascending.
///
/// Created by [`IntoIterator::into_iter`] on a set by value. Each step
/// moves the element out of its arena slot; dropping the iterator
/// early drops the unvisited elements with it.
pub struct IntoIter<T> {
    arena: Arena<T>,
    stack: Spine,
    next: usize,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut cur = self.next;
        while cur != NIL {
            self.stack.push(cur);
            cur = self.arena.get(cur).left;
        }
        let idx = self.stack.pop()?;
        let node = self.arena.remove(idx);
        self.next = node.right;
        self.remaining -= 1;
        Some(node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let remaining = self.len();
        IntoIter {
            next: self.root,
            arena: self.arena,
            stack: Spine::new(),
            remaining,
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec::Vec;

    use crate::set::OrderedSet;

    #[test]
    fn iter_is_sorted_and_exact() {
        let set: OrderedSet<i32> = [9, 1, 8, 2, 7, 3].into_iter().collect();
        let mut iter = set.iter();

        assert_eq!(iter.size_hint(), (6, Some(6)));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.size_hint(), (5, Some(5)));
        assert_eq!(iter.copied().collect::<Vec<_>>(), [2, 3, 7, 8, 9]);
    }

    #[test]
    fn early_termination_leaves_set_intact() {
        let set: OrderedSet<i32> = (0..100).collect();
        let first_three: Vec<i32> = set.iter().take(3).copied().collect();
        assert_eq!(first_three, [0, 1, 2]);

        // The set is untouched after the abandoned traversal.
        assert_eq!(set.len(), 100);
        assert_eq!(set.iter().count(), 100);
    }

    #[test]
    fn iter_is_fused() {
        let set: OrderedSet<i32> = [1].into_iter().collect();
        let mut iter = set.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn into_iter_moves_elements_in_order() {
        let set: OrderedSet<alloc::string::String> =
            ["b", "a", "c"].into_iter().map(Into::into).collect();

        let owned: Vec<alloc::string::String> = set.into_iter().collect();
        assert_eq!(owned, ["a", "b", "c"]);
    }

    #[test]
    fn into_iter_partial_consumption_drops_rest() {
        let set: OrderedSet<i32> = (0..50).collect();
        let mut iter = set.into_iter();
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.size_hint(), (48, Some(48)));
        drop(iter);
    }

    #[test]
    fn extend_deduplicates() {
        let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
        set.extend([3, 4, 4, 5]);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn debug_renders_like_a_set() {
        let set: OrderedSet<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
        let b: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
        let c: OrderedSet<i32> = [1, 2].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn borrowed_into_iterator_in_for_loop() {
        let set: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
        let mut seen = Vec::new();
        for value in &set {
            seen.push(*value);
        }
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn deep_traversal_spills_past_inline_stack() {
        // Height exceeds the inline spine capacity of 16 well before
        // 2000 elements.
        let set: OrderedSet<u32> = (0..2000).collect();
        assert!(set.iter().copied().eq(0..2000));
    }
}
