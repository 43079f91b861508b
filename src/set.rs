use core::cmp::Ordering;

use crate::iter::Iter;
use crate::node::{Arena, Color, NIL, Node};

/// An ordered set of unique values, backed by an arena-allocated
/// red-black tree.
///
/// Membership, insertion, removal and min/max all run in O(log n);
/// [`iter`](OrderedSet::iter) yields the elements in ascending order.
/// The element type only has to implement [`Ord`]. Equal elements per
/// `Ord` are the same element, and a stored value is never mutated in
/// place.
///
/// # Examples
///
/// ```
/// use rbset::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// set.insert("pine");
/// set.insert("oak");
/// set.insert("birch");
///
/// assert!(set.contains(&"oak"));
/// assert_eq!(set.min(), Some(&"birch"));
/// assert_eq!(set.iter().count(), 3);
/// ```
#[derive(Clone)]
pub struct OrderedSet<T> {
    /// Owns every node; tree links are indices into it.
    pub(crate) arena: Arena<T>,

    /// Index of the root node, `NIL` when the set is empty.
    pub(crate) root: usize,

    /// Number of elements currently present.
    len: usize,
}

impl<T> OrderedSet<T> {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: NIL,
            len: 0,
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NIL;
        self.len = 0;
    }

    /// Returns a reference to the smallest element, or `None` if the
    /// set is empty.
    pub fn min(&self) -> Option<&T> {
        if self.root == NIL {
            return None;
        }
        Some(&self.arena.get(self.min_node(self.root)).value)
    }

    /// Returns a reference to the largest element, or `None` if the
    /// set is empty.
    pub fn max(&self) -> Option<&T> {
        if self.root == NIL {
            return None;
        }
        Some(&self.arena.get(self.max_node(self.root)).value)
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// The traversal is lazy: it walks the tree with an explicit stack
    /// bounded by the tree height and may be dropped before exhaustion.
    /// Because the iterator borrows the set, inserting or removing
    /// while a traversal is live is rejected at compile time.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Index of the leftmost node of the subtree rooted at `idx`.
    /// `idx` must not be `NIL`.
    pub(crate) fn min_node(&self, mut idx: usize) -> usize {
        loop {
            let left = self.arena.get(idx).left;
            if left == NIL {
                return idx;
            }
            idx = left;
        }
    }

    /// Index of the rightmost node of the subtree rooted at `idx`.
    /// `idx` must not be `NIL`.
    fn max_node(&self, mut idx: usize) -> usize {
        loop {
            let right = self.arena.get(idx).right;
            if right == NIL {
                return idx;
            }
            idx = right;
        }
    }
}

impl<T: Ord> OrderedSet<T> {
    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value) != NIL
    }

    /// Adds `value` to the set.
    ///
    /// Returns `true` if the value was newly inserted, `false` if it
    /// was already present (in which case the set is unchanged).
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert!(set.insert(10));
    /// assert!(!set.insert(10));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut parent = NIL;
        let mut cur = self.root;
        let mut went_left = false;

        while cur != NIL {
            let node = self.arena.get(cur);
            parent = cur;
            match value.cmp(&node.value) {
                Ordering::Less => {
                    went_left = true;
                    cur = node.left;
                }
                Ordering::Greater => {
                    went_left = false;
                    cur = node.right;
                }
                Ordering::Equal => return false,
            }
        }

        let idx = self.arena.insert(Node::leaf(value, parent));
        if parent == NIL {
            self.root = idx;
        } else if went_left {
            self.arena.get_mut(parent).left = idx;
        } else {
            self.arena.get_mut(parent).right = idx;
        }
        self.len += 1;

        self.insert_fixup(idx);
        debug_assert!(
            self.check_invariants(),
            "red-black invariants violated after insert"
        );
        true
    }

    /// Removes `value` from the set.
    ///
    /// Returns `true` if the value was present, `false` if it was
    /// absent (in which case the set is unchanged).
    pub fn remove(&mut self, value: &T) -> bool {
        let idx = self.find(value);
        if idx == NIL {
            return false;
        }
        self.delete(idx);
        self.len -= 1;

        debug_assert!(
            self.check_invariants(),
            "red-black invariants violated after remove"
        );
        true
    }

    /// Descends from the root by comparison; returns the index holding
    /// `value`, or `NIL`.
    fn find(&self, value: &T) -> usize {
        let mut cur = self.root;
        while cur != NIL {
            let node = self.arena.get(cur);
            match value.cmp(&node.value) {
                Ordering::Less => cur = node.left,
                Ordering::Greater => cur = node.right,
                Ordering::Equal => return cur,
            }
        }
        NIL
    }

    /// Unlinks the node at `z` from the tree, rebalances if a black
    /// node was removed from some path, and frees the slot.
    fn delete(&mut self, z: usize) {
        let (removed_color, x, x_parent) = self.unlink(z);
        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }
        self.arena.remove(z);
    }

    /// Structurally detaches `z`, reporting what the fixup needs: the
    /// color that left the tree, the node spliced into its place (may
    /// be `NIL`), and that node's parent.
    ///
    /// A node with at most one child is replaced by that child. A node
    /// with two children is replaced by its in-order successor (the
    /// minimum of the right subtree, which has no left child); the
    /// successor takes over `z`'s links and color, so the color that
    /// actually leaves a path is the successor's own.
    fn unlink(&mut self, z: usize) -> (Color, usize, usize) {
        let node = self.arena.get(z);
        let (color, left, right) = (node.color, node.left, node.right);

        if left == NIL {
            let parent = self.arena.get(z).parent;
            self.transplant(z, right);
            (color, right, parent)
        } else if right == NIL {
            let parent = self.arena.get(z).parent;
            self.transplant(z, left);
            (color, left, parent)
        } else {
            let succ = self.min_node(right);
            let succ_color = self.arena.get(succ).color;
            let x = self.arena.get(succ).right;

            let x_parent = if self.arena.get(succ).parent == z {
                succ
            } else {
                let parent = self.arena.get(succ).parent;
                self.transplant(succ, x);
                self.arena.get_mut(succ).right = right;
                self.arena.get_mut(right).parent = succ;
                parent
            };

            self.transplant(z, succ);
            self.arena.get_mut(succ).left = left;
            self.arena.get_mut(left).parent = succ;
            self.arena.get_mut(succ).color = color;

            (succ_color, x, x_parent)
        }
    }

    /// Replaces the subtree rooted at `old` with the one rooted at
    /// `new` (which may be `NIL`) in `old`'s parent.
    fn transplant(&mut self, old: usize, new: usize) {
        let parent = self.arena.get(old).parent;
        if parent == NIL {
            self.root = new;
        } else if old == self.arena.get(parent).left {
            self.arena.get_mut(parent).left = new;
        } else {
            self.arena.get_mut(parent).right = new;
        }
        if new != NIL {
            self.arena.get_mut(new).parent = parent;
        }
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
