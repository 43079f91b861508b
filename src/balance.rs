//! Rebalancing passes for [`OrderedSet`]: the rotation primitives and
//! the insert/delete fixups that restore the red-black invariants
//! after a structural mutation. Both fixups are iterative loops that
//! climb toward the root, so stack usage stays O(1).

use crate::node::{Color, NIL};
use crate::set::OrderedSet;

impl<T> OrderedSet<T> {
    #[inline]
    fn color_of(&self, idx: usize) -> Color {
        if idx == NIL {
            Color::Black
        } else {
            self.arena.get(idx).color
        }
    }

    #[inline]
    fn set_color(&mut self, idx: usize, color: Color) {
        if idx != NIL {
            self.arena.get_mut(idx).color = color;
        }
    }

    #[inline]
    fn is_red(&self, idx: usize) -> bool {
        self.color_of(idx) == Color::Red
    }

    #[inline]
    fn is_black(&self, idx: usize) -> bool {
        self.color_of(idx) == Color::Black
    }

    #[inline]
    fn parent_of(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.arena.get(idx).parent
        }
    }

    #[inline]
    fn left_of(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.arena.get(idx).left
        }
    }

    #[inline]
    fn right_of(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.arena.get(idx).right
        }
    }

    /// Pivots `x` down-left; `x`'s right child takes its place. All
    /// five affected links (two children, three parents) are re-linked
    /// before returning, preserving in-order positions.
    fn rotate_left(&mut self, x: usize) {
        let y = self.right_of(x);
        if x == NIL || y == NIL {
            return;
        }

        let y_left = self.arena.get(y).left;
        self.arena.get_mut(x).right = y_left;
        if y_left != NIL {
            self.arena.get_mut(y_left).parent = x;
        }

        let x_parent = self.arena.get(x).parent;
        self.arena.get_mut(y).parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if x == self.arena.get(x_parent).left {
            self.arena.get_mut(x_parent).left = y;
        } else {
            self.arena.get_mut(x_parent).right = y;
        }

        self.arena.get_mut(y).left = x;
        self.arena.get_mut(x).parent = y;
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, x: usize) {
        let y = self.left_of(x);
        if x == NIL || y == NIL {
            return;
        }

        let y_right = self.arena.get(y).right;
        self.arena.get_mut(x).left = y_right;
        if y_right != NIL {
            self.arena.get_mut(y_right).parent = x;
        }

        let x_parent = self.arena.get(x).parent;
        self.arena.get_mut(y).parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if x == self.arena.get(x_parent).right {
            self.arena.get_mut(x_parent).right = y;
        } else {
            self.arena.get_mut(x_parent).left = y;
        }

        self.arena.get_mut(y).right = x;
        self.arena.get_mut(x).parent = y;
    }

    /// Restores the invariants after attaching the red leaf `x`.
    ///
    /// While `x`'s parent is red: a red uncle means recolor and climb
    /// to the grandparent; a black uncle means at most two rotations
    /// (the triangle case first rotates the parent into a line) and
    /// the loop terminates. At most 2 rotations total.
    pub(crate) fn insert_fixup(&mut self, mut x: usize) {
        while x != self.root && self.is_red(self.parent_of(x)) {
            let parent = self.parent_of(x);
            let grand = self.parent_of(parent);

            if parent == self.left_of(grand) {
                let uncle = self.right_of(grand);
                if self.is_red(uncle) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    x = grand;
                } else {
                    if x == self.right_of(parent) {
                        x = parent;
                        self.rotate_left(x);
                    }
                    let parent = self.parent_of(x);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.left_of(grand);
                if self.is_red(uncle) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    x = grand;
                } else {
                    if x == self.left_of(parent) {
                        x = parent;
                        self.rotate_right(x);
                    }
                    let parent = self.parent_of(x);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    self.rotate_left(grand);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Restores black-height balance after a black node left the tree.
    ///
    /// `x` is the node that structurally replaced it and carries the
    /// deficit; `parent` is `x`'s parent, passed explicitly because
    /// `x` may be `NIL` (the removed node had no child on that side).
    /// Cases pivot on the sibling's color and its children's colors;
    /// the deficit climbs until a red node absorbs it or the root is
    /// reached. At most 3 rotations total.
    pub(crate) fn delete_fixup(&mut self, mut x: usize, mut parent: usize) {
        while x != self.root && self.is_black(x) {
            if parent == NIL {
                break;
            }

            if x == self.left_of(parent) {
                let mut sibling = self.right_of(parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.right_of(parent);
                }

                if self.is_black(self.left_of(sibling)) && self.is_black(self.right_of(sibling)) {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                    parent = self.parent_of(x);
                } else {
                    if self.is_black(self.right_of(sibling)) {
                        self.set_color(self.left_of(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right_of(parent);
                    }
                    self.set_color(sibling, self.color_of(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.right_of(sibling), Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut sibling = self.left_of(parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.left_of(parent);
                }

                if self.is_black(self.right_of(sibling)) && self.is_black(self.left_of(sibling)) {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                    parent = self.parent_of(x);
                } else {
                    if self.is_black(self.left_of(sibling)) {
                        self.set_color(self.right_of(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left_of(parent);
                    }
                    self.set_color(sibling, self.color_of(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.left_of(sibling), Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    /// Full structural audit: black root, consistent parent links, no
    /// red node with a red child, equal black-height on every path.
    /// Re-checked after every mutation in debug builds.
    pub(crate) fn check_invariants(&self) -> bool {
        if self.root == NIL {
            return true;
        }
        if self.is_red(self.root) || self.arena.get(self.root).parent != NIL {
            return false;
        }
        self.black_height(self.root).is_some()
    }

    /// Black-height of the subtree at `idx` counting the absent-child
    /// position, or `None` if any invariant is violated below it.
    fn black_height(&self, idx: usize) -> Option<usize> {
        if idx == NIL {
            return Some(1);
        }
        let node = self.arena.get(idx);

        if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
            return None;
        }
        if node.left != NIL && self.arena.get(node.left).parent != idx {
            return None;
        }
        if node.right != NIL && self.arena.get(node.right).parent != idx {
            return None;
        }

        let left = self.black_height(node.left)?;
        let right = self.black_height(node.right)?;
        if left != right {
            return None;
        }
        Some(left + usize::from(node.color == Color::Black))
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    #[cfg(test)]
    fn subtree_height(&self, idx: usize) -> usize {
        if idx == NIL {
            0
        } else {
            let node = self.arena.get(idx);
            1 + self.subtree_height(node.left).max(self.subtree_height(node.right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[i32]) -> OrderedSet<i32> {
        let mut set = OrderedSet::new();
        for &v in values {
            set.insert(v);
        }
        set
    }

    #[test]
    fn root_is_black_after_every_insert() {
        let mut set = OrderedSet::new();
        for x in [7, 3, 18, 10, 22, 8, 11, 26] {
            set.insert(x);
            assert!(set.is_black(set.root));
        }
    }

    #[test]
    fn ascending_insert_triggers_left_rotations() {
        let set = filled(&[1, 2, 3]);
        // After the line-case fixup the middle value must be the root.
        assert_eq!(set.arena.get(set.root).value, 2);
        assert!(set.check_invariants());
    }

    #[test]
    fn descending_insert_triggers_right_rotations() {
        let set = filled(&[3, 2, 1]);
        assert_eq!(set.arena.get(set.root).value, 2);
        assert!(set.check_invariants());
    }

    #[test]
    fn triangle_case_straightens_before_rotating() {
        // 3, 1, 2 forms a left-right triangle under the root.
        let set = filled(&[3, 1, 2]);
        assert_eq!(set.arena.get(set.root).value, 2);
        assert_eq!(set.arena.get(set.arena.get(set.root).left).value, 1);
        assert_eq!(set.arena.get(set.arena.get(set.root).right).value, 3);
        assert!(set.check_invariants());
    }

    #[test]
    fn invariants_hold_through_mixed_workload() {
        let mut set = OrderedSet::new();
        let ops: [(bool, i32); 15] = [
            (true, 50),
            (true, 25),
            (true, 75),
            (true, 12),
            (true, 37),
            (false, 25),
            (true, 100),
            (false, 50),
            (true, 1),
            (false, 12),
            (true, 200),
            (true, 150),
            (false, 75),
            (true, 300),
            (false, 1),
        ];

        for (is_insert, value) in ops {
            if is_insert {
                set.insert(value);
            } else {
                set.remove(&value);
            }
            assert!(set.check_invariants());
        }
    }

    #[test]
    fn delete_fixup_handles_nil_replacement() {
        // Removing a black leaf leaves a nil node carrying the
        // deficit; the fixup must still rebalance around its parent.
        let mut set = filled(&[2, 1, 3, 4]);
        assert!(set.remove(&1));
        assert!(set.check_invariants());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn verifier_rejects_red_root() {
        let mut set = filled(&[1, 2, 3]);
        set.set_color(set.root, Color::Red);
        assert!(!set.check_invariants());
    }

    #[test]
    fn verifier_rejects_red_red_edge() {
        // After the uncle-red recolor, 0 is the only red node and sits
        // under black 1; painting 1 red makes a red-red edge.
        let mut set = filled(&[2, 1, 3, 0]);
        let leftmost = set.min_node(set.root);
        set.set_color(set.arena.get(leftmost).parent, Color::Red);
        assert!(!set.check_invariants());
    }

    #[test]
    fn verifier_rejects_unbalanced_black_height() {
        let mut set = filled(&[2, 1, 3]);
        let left = set.arena.get(set.root).left;
        set.set_color(left, Color::Black);
        let right = set.arena.get(set.root).right;
        set.set_color(right, Color::Red);
        assert!(!set.check_invariants());
    }
}
