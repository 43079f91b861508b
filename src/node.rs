use alloc::vec::Vec;

/// Sentinel index standing for an absent node (empty subtree, or the
/// parent of the root). Absent nodes count as black.
pub(crate) const NIL: usize = usize::MAX;

/// Node colors used to maintain the red-black balance properties:
/// red nodes have black children, and every root-to-leaf path crosses
/// the same number of black nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A node of the tree. Links are indices into the arena; `NIL` marks an
/// absent child or parent. The parent link is a pure back-reference and
/// never implies ownership.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// The stored element; never mutated after creation.
    pub(crate) value: T,

    /// Balancing metadata.
    pub(crate) color: Color,

    /// Index of the structural parent (`NIL` for the root).
    pub(crate) parent: usize,

    /// Index of the left child (`NIL` if the left subtree is empty).
    pub(crate) left: usize,

    /// Index of the right child (`NIL` if the right subtree is empty).
    pub(crate) right: usize,
}

/// One slot of the arena. Vacant slots thread the free list: each holds
/// the index of the next vacant slot (`NIL` at the end of the list).
#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant(usize),
}

/// Slot arena owning every node of the tree. Nodes are addressed by
/// stable indices, so the cyclic parent/child link shape never turns
/// into cyclic ownership. Freed slots are recycled LIFO through an
/// intrusive free list.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: NIL,
        }
    }

    /// Stores `node` and returns its index, reusing a vacant slot when
    /// one is available.
    pub(crate) fn insert(&mut self, node: Node<T>) -> usize {
        if self.free_head == NIL {
            self.slots.push(Slot::Occupied(node));
            self.slots.len() - 1
        } else {
            let idx = self.free_head;
            match core::mem::replace(&mut self.slots[idx], Slot::Occupied(node)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!("free list led to an occupied slot"),
            }
            idx
        }
    }

    /// Vacates the slot at `idx` and returns the node it held.
    pub(crate) fn remove(&mut self, idx: usize) -> Node<T> {
        match core::mem::replace(&mut self.slots[idx], Slot::Vacant(self.free_head)) {
            Slot::Occupied(node) => {
                self.free_head = idx;
                node
            }
            Slot::Vacant(_) => unreachable!("removed a vacant slot"),
        }
    }

    pub(crate) fn get(&self, idx: usize) -> &Node<T> {
        match &self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("read a vacant slot"),
        }
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("read a vacant slot"),
        }
    }

    /// Drops every node and resets the free list.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NIL;
    }
}

impl<T> Node<T> {
    /// A freshly inserted node: red, childless, attached under `parent`.
    pub(crate) const fn leaf(value: T, parent: usize) -> Self {
        Self {
            value,
            color: Color::Red,
            parent,
            left: NIL,
            right: NIL,
        }
    }
}
