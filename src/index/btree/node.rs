//! The node sum type shared by both tree levels.

use super::leaf_node::LeafNode;
use super::non_leaf_node::NonLeafNode;

/// A tree node: either a leaf holding values or a non-leaf routing to
/// children.
///
/// The set of node kinds is closed, so every structural operation matches
/// on the variant instead of dispatching through a trait object.
#[derive(Debug, Clone)]
pub enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    NonLeaf(NonLeafNode<K>),
}

impl<K, V> Node<K, V> {
    /// Return whether the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Degree the node was created with.
    pub fn degree(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.degree(),
            Node::NonLeaf(inner) => inner.degree(),
        }
    }

    /// Keys stored in the node: entries for a leaf, separators otherwise.
    pub fn keys(&self) -> &[K] {
        match self {
            Node::Leaf(leaf) => leaf.keys(),
            Node::NonLeaf(inner) => inner.keys(),
        }
    }

    /// Number of populated key slots.
    pub fn number_of_keys(&self) -> usize {
        self.keys().len()
    }

    /// Number of populated pointer slots (values or children).
    pub fn number_of_pointers(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.number_of_keys(),
            Node::NonLeaf(inner) => inner.children().len(),
        }
    }

    /// True if one more key/pointer pair still fits within capacity.
    pub fn has_room(&self) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.has_room(),
            Node::NonLeaf(inner) => inner.has_room(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::NonLeaf(_) => None,
        }
    }

    pub fn as_non_leaf(&self) -> Option<&NonLeafNode<K>> {
        match self {
            Node::Leaf(_) => None,
            Node::NonLeaf(inner) => Some(inner),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> Option<&mut LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::NonLeaf(_) => None,
        }
    }

    pub(crate) fn as_non_leaf_mut(&mut self) -> Option<&mut NonLeafNode<K>> {
        match self {
            Node::Leaf(_) => None,
            Node::NonLeaf(inner) => Some(inner),
        }
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Remove `key` and its co-located pointer.
    ///
    /// For a leaf that is the associated value; for a non-leaf it is the
    /// child to the right of the separator. Returns whether anything was
    /// removed.
    pub(crate) fn delete(&mut self, key: &K) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.delete(key).is_some(),
            Node::NonLeaf(inner) => inner.delete(key).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NodeId;

    #[test]
    fn test_leaf_variant() {
        let mut leaf: LeafNode<i32, &str> = LeafNode::new(4);
        leaf.push(1, "a");
        leaf.push(2, "b");
        let node = Node::Leaf(leaf);

        assert!(node.is_leaf());
        assert_eq!(node.keys(), &[1, 2]);
        assert_eq!(node.number_of_keys(), 2);
        assert_eq!(node.number_of_pointers(), 2);
        assert!(node.has_room());
        assert!(node.as_leaf().is_some());
        assert!(node.as_non_leaf().is_none());
    }

    #[test]
    fn test_non_leaf_variant() {
        let node: Node<i32, &str> = Node::NonLeaf(NonLeafNode::with_children(
            4,
            30,
            NodeId::new(0),
            NodeId::new(1),
        ));

        assert!(!node.is_leaf());
        assert_eq!(node.number_of_keys(), 1);
        assert_eq!(node.number_of_pointers(), 2);
        assert_eq!(node.degree(), 4);
        assert!(node.as_non_leaf().is_some());
    }

    #[test]
    fn test_delete_dispatch() {
        let mut leaf: LeafNode<i32, &str> = LeafNode::new(4);
        leaf.push(1, "a");
        let mut node = Node::Leaf(leaf);
        assert!(node.delete(&1));
        assert!(!node.delete(&1));
        assert_eq!(node.number_of_keys(), 0);

        let mut node: Node<i32, &str> = Node::NonLeaf(NonLeafNode::with_children(
            4,
            30,
            NodeId::new(0),
            NodeId::new(1),
        ));
        assert!(node.delete(&30));
        assert_eq!(node.number_of_pointers(), 1);
    }
}
