//! Non-leaf nodes: separator keys and child routing.

use crate::common::config::max_keys;
use crate::common::NodeId;

/// An interior node: `k` separator keys routing between `k + 1` children.
///
/// Child `i` covers keys in `[keys[i-1], keys[i])`, open at both ends.
///
/// ```text
///              keys:      [20]      [40]
///           children: [c0]    [c1]      [c2]
///                      <20   20..40    >=40
/// ```
///
/// Separators are not necessarily present in any leaf: a deleted key may
/// keep routing traffic as a separator until a merge or redistribution
/// replaces it.
#[derive(Debug, Clone)]
pub struct NonLeafNode<K> {
    /// Maximum number of children this node may hold.
    degree: usize,

    /// Strictly ascending separator keys.
    keys: Vec<K>,

    /// Exclusively owned children; always `keys.len() + 1` of them.
    children: Vec<NodeId>,
}

impl<K> NonLeafNode<K> {
    /// Create a node routing between two children, as built when a split
    /// reaches the root.
    pub(crate) fn with_children(degree: usize, key: K, left: NodeId, right: NodeId) -> Self {
        let mut keys = Vec::with_capacity(degree);
        let mut children = Vec::with_capacity(degree + 1);
        keys.push(key);
        children.push(left);
        children.push(right);
        Self {
            degree,
            keys,
            children,
        }
    }

    fn empty(degree: usize) -> Self {
        Self {
            degree,
            keys: Vec::with_capacity(degree),
            children: Vec::with_capacity(degree + 1),
        }
    }

    /// Degree this node was created with.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Separator keys, ascending.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child node ids, left to right.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of separator keys.
    pub fn number_of_keys(&self) -> usize {
        self.keys.len()
    }

    /// True if one more separator/child pair still fits within capacity.
    pub fn has_room(&self) -> bool {
        self.keys.len() < max_keys(self.degree)
    }

    /// Index of `child` among this node's children.
    pub fn position_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Insert `key` and `new_child` immediately to the right of `after`.
    ///
    /// May overflow the node by one pair; the caller splits it right after.
    ///
    /// # Panics
    /// Panics if `after` is not a child of this node.
    pub(crate) fn insert_after(&mut self, key: K, new_child: NodeId, after: NodeId) {
        let index = match self.position_of(after) {
            Some(index) => index,
            None => panic!("{} is not a child of this node", after),
        };
        self.keys.insert(index, key);
        self.children.insert(index + 1, new_child);
    }

    /// Split an overflowing node at `m`.
    ///
    /// Keys `[0, m-1)` stay, key `m-1` is returned for promotion, keys
    /// `[m, len)` and their children move into the returned sibling.
    pub(crate) fn split_off(&mut self, m: usize) -> (K, Self) {
        let mut sibling = Self::empty(self.degree);
        sibling.keys.extend(self.keys.drain(m..));
        sibling.children.extend(self.children.drain(m..));

        let promoted = self.keys.remove(m - 1);
        (promoted, sibling)
    }

    /// Merge `other` onto the end of this node, pulling `separator` down
    /// between the two key runs.
    pub(crate) fn append(&mut self, separator: K, other: &mut Self) {
        self.keys.push(separator);
        self.keys.append(&mut other.keys);
        self.children.append(&mut other.children);
    }

    /// Remove the first separator and the first child.
    pub(crate) fn pop_first(&mut self) -> (K, NodeId) {
        (self.keys.remove(0), self.children.remove(0))
    }

    /// Remove the last separator and the last child.
    pub(crate) fn pop_last(&mut self) -> (K, NodeId) {
        match (self.keys.pop(), self.children.pop()) {
            (Some(key), Some(child)) => (key, child),
            _ => panic!("pop_last on a non-leaf node without separators"),
        }
    }

    /// Prepend a separator and a new leftmost child.
    pub(crate) fn push_front(&mut self, key: K, child: NodeId) {
        self.keys.insert(0, key);
        self.children.insert(0, child);
    }

    /// Append a separator and a new rightmost child.
    pub(crate) fn push_back(&mut self, key: K, child: NodeId) {
        self.keys.push(key);
        self.children.push(child);
    }

    /// Replace the separator at `index`, returning the old one.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        std::mem::replace(&mut self.keys[index], key)
    }
}

impl<K: Ord> NonLeafNode<K> {
    /// Index of the child responsible for `key`.
    ///
    /// The first separator strictly greater than `key` bounds the child on
    /// its right; a key equal to a separator routes right.
    pub fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|separator| separator <= key)
    }

    /// Child responsible for `key`.
    pub fn child(&self, key: &K) -> NodeId {
        self.children[self.child_index(key)]
    }

    /// Remove the separator equal to `key` together with the child to its
    /// right, returning both.
    pub(crate) fn delete(&mut self, key: &K) -> Option<(K, NodeId)> {
        let index = self.keys.binary_search(key).ok()?;
        Some((self.keys.remove(index), self.children.remove(index + 1)))
    }
}
