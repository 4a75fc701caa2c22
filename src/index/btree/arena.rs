//! Index-addressed node storage.

use std::ops::{Index, IndexMut};

use crate::common::NodeId;

use super::leaf_node::LeafNode;
use super::node::Node;
use super::non_leaf_node::NonLeafNode;

/// Owns every node of one tree.
///
/// Parents refer to children and leaves refer to their successor by
/// [`NodeId`], so the hierarchy has a single owner (the arena) and no
/// reference cycles. Freed slots go on a free list and are reused.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────┐
/// │                      NodeArena                        │
/// │  slots: Vec<Option<Node>>                             │
/// │   [0: Leaf] [1: Leaf] [2: None] [3: NonLeaf] ...      │
/// │  free_list: Vec<NodeId>   (LIFO: [2])                 │
/// └───────────────────────────────────────────────────────┘
/// ```
///
/// Cloning the arena clones every node with its id intact, which is what
/// makes a cloned tree a faithful deep copy of the hierarchy and the leaf
/// chain.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K, V> {
    /// Node storage; `None` marks a freed slot.
    slots: Vec<Option<Node<K, V>>>,

    /// Stack of free slot ids (LIFO for locality).
    free_list: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `node`, reusing a freed slot if there is one.
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        match self.free_list.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Remove the node at `id` and hand it back to the caller.
    ///
    /// # Panics
    /// Panics if the slot is already free.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(id);
                node
            }
            None => panic!("double free of {}", id),
        }
    }

    /// Node at `id`, or `None` if the id is unknown or freed.
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Drop every node and forget all ids.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    /// The leaf at `id`.
    ///
    /// # Panics
    /// Panics if `id` is free or refers to a non-leaf.
    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match self[id].as_leaf() {
            Some(leaf) => leaf,
            None => panic!("{} is not a leaf", id),
        }
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match self[id].as_leaf_mut() {
            Some(leaf) => leaf,
            None => panic!("{} is not a leaf", id),
        }
    }

    /// The non-leaf at `id`.
    ///
    /// # Panics
    /// Panics if `id` is free or refers to a leaf.
    pub(crate) fn non_leaf(&self, id: NodeId) -> &NonLeafNode<K> {
        match self[id].as_non_leaf() {
            Some(inner) => inner,
            None => panic!("{} is not a non-leaf node", id),
        }
    }

    pub(crate) fn non_leaf_mut(&mut self, id: NodeId) -> &mut NonLeafNode<K> {
        match self[id].as_non_leaf_mut() {
            Some(inner) => inner,
            None => panic!("{} is not a non-leaf node", id),
        }
    }

    /// Mutable access to two distinct nodes at once.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K, V>, &mut Node<K, V>) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");

        let (first, second, swapped) = if a.0 < b.0 {
            (a.0, b.0, false)
        } else {
            (b.0, a.0, true)
        };
        let (low, high) = self.slots.split_at_mut(second);
        let (x, y) = match (low[first].as_mut(), high[0].as_mut()) {
            (Some(x), Some(y)) => (x, y),
            _ => panic!("pair_mut on a freed slot ({}, {})", a, b),
        };

        if swapped {
            (y, x)
        } else {
            (x, y)
        }
    }

    /// Smallest key stored under `id`: the node's own first key for a leaf,
    /// the first key of the leftmost descendant leaf otherwise.
    pub(crate) fn first_key(&self, id: NodeId) -> Option<&K> {
        let mut current = id;
        loop {
            match self.get(current)? {
                Node::Leaf(leaf) => return leaf.first_key(),
                Node::NonLeaf(inner) => current = *inner.children().first()?,
            }
        }
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{} is not a live node", id),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("{} is not a live node", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(keys: &[i32]) -> Node<i32, i32> {
        let mut leaf = LeafNode::new(4);
        for &k in keys {
            leaf.push(k, k * 10);
        }
        Node::Leaf(leaf)
    }

    #[test]
    fn test_allocate_sequential_ids() {
        let mut arena = NodeArena::new();
        assert_eq!(arena.allocate(leaf(&[1])), NodeId::new(0));
        assert_eq!(arena.allocate(leaf(&[2])), NodeId::new(1));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_free_and_reuse() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(leaf(&[1]));
        let _b = arena.allocate(leaf(&[2]));

        let freed = arena.free(a);
        assert_eq!(freed.keys(), &[1]);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(a).is_none());

        // Freed slot is reused first
        let c = arena.allocate(leaf(&[3]));
        assert_eq!(c, a);
        assert_eq!(arena[c].keys(), &[3]);
    }

    #[test]
    #[should_panic]
    fn test_double_free_panics() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(leaf(&[1]));
        arena.free(a);
        arena.free(a);
    }

    #[test]
    #[should_panic]
    fn test_index_freed_slot_panics() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(leaf(&[1]));
        arena.free(a);
        let _ = &arena[a];
    }

    #[test]
    fn test_pair_mut_order() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(leaf(&[1]));
        let b = arena.allocate(leaf(&[2]));

        let (x, y) = arena.pair_mut(b, a);
        assert_eq!(x.keys(), &[2]);
        assert_eq!(y.keys(), &[1]);

        let (x, y) = arena.pair_mut(a, b);
        assert_eq!(x.keys(), &[1]);
        assert_eq!(y.keys(), &[2]);
    }

    #[test]
    fn test_first_key_descends_leftmost() {
        let mut arena = NodeArena::new();
        let left = arena.allocate(leaf(&[5, 6]));
        let right = arena.allocate(leaf(&[9]));
        let root = arena.allocate(Node::NonLeaf(NonLeafNode::with_children(
            4, 9, left, right,
        )));

        assert_eq!(arena.first_key(root), Some(&5));
        assert_eq!(arena.first_key(right), Some(&9));
    }

    #[test]
    fn test_typed_accessors() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(leaf(&[1]));
        arena.leaf_mut(a).push(2, 20);
        assert_eq!(arena.leaf(a).keys(), &[1, 2]);
    }

    #[test]
    #[should_panic]
    fn test_wrong_variant_panics() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(leaf(&[1]));
        arena.non_leaf(a);
    }
}
