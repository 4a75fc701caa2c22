//! B+-tree orchestrator: lookup and insertion.
//!
//! Deletion lives in [`delete`](super::delete); both share the
//! [`BPlusTree`] type defined here.

use std::fmt;

use tracing::{debug, trace};

use crate::common::config::{split_point, DEFAULT_DEGREE, MIN_DEGREE};
use crate::common::{Error, NodeId, Result};

use super::arena::NodeArena;
use super::leaf_node::LeafNode;
use super::node::Node;
use super::non_leaf_node::NonLeafNode;
use super::stats::TreeStats;

/// An in-memory B+-tree mapping ordered keys to values.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │                          BPlusTree                           │
/// │  degree: usize          root: Option<NodeId>                 │
/// │  ┌────────────────────────────────────────────────────────┐  │
/// │  │ nodes: NodeArena   (owns every node, ids are indices)  │  │
/// │  └────────────────────────────────────────────────────────┘  │
/// │                     [NonLeaf: 30]                            │
/// │                     /           \                            │
/// │          [Leaf: 10 20] ──────▶ [Leaf: 30 40] ──▶ None        │
/// └──────────────────────────────────────────────────────────────┘
/// ```
///
/// Nodes keep no parent pointers. When a split or merge needs a parent,
/// the tree re-descends from the root ([`find_parent`](Self::find_parent)).
///
/// # Usage
/// ```
/// use interchange_bptree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// tree.insert(10, "ten");
/// tree.insert(20, "twenty");
///
/// assert_eq!(tree.get(&10), Some(&"ten"));
/// assert!(tree.delete(&10, &"ten"));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<K, V> {
    /// Maximum number of pointers per node (immutable after construction).
    pub(super) degree: usize,

    /// Root node, `None` while the tree is empty.
    pub(super) root: Option<NodeId>,

    /// Storage for every node of the tree.
    pub(super) nodes: NodeArena<K, V>,

    /// Number of entries stored in the leaves.
    pub(super) len: usize,

    /// Structural-change counters.
    pub(super) stats: TreeStats,
}

impl<K, V> BPlusTree<K, V> {
    // ========================================================================
    // Public API: Structure and info
    // ========================================================================

    /// Get the configured degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Get the root node id, `None` for an empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Read-only view of the node at `id`.
    ///
    /// Returns `None` for ids that are not (or no longer) part of the tree.
    pub fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.nodes.get(id)
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes at every level.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels; 0 for an empty tree, 1 for a single leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = match &self.nodes[id] {
                Node::Leaf(_) => None,
                Node::NonLeaf(inner) => inner.children().first().copied(),
            };
        }
        height
    }

    /// Get structural statistics.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Reset structural statistics to zero.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Remove every entry. The degree and statistics are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Leftmost leaf, the head of the successor chain.
    pub(super) fn first_leaf(&self) -> Option<NodeId> {
        self.edge_leaf(|children| children.first().copied())
    }

    /// Rightmost leaf, the tail of the successor chain.
    pub(super) fn last_leaf(&self) -> Option<NodeId> {
        self.edge_leaf(|children| children.last().copied())
    }

    fn edge_leaf(&self, pick: impl Fn(&[NodeId]) -> Option<NodeId>) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            match &self.nodes[current] {
                Node::Leaf(_) => return Some(current),
                Node::NonLeaf(inner) => current = pick(inner.children())?,
            }
        }
    }

    /// Smallest entry.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.nodes.leaf(self.first_leaf()?).entry(0)
    }

    /// Largest entry.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.nodes.leaf(self.last_leaf()?);
        leaf.entry(leaf.number_of_keys().checked_sub(1)?)
    }
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Create an empty tree whose nodes hold at most `degree` pointers.
    ///
    /// # Errors
    /// - `Error::InvalidConfiguration` if `degree` is below [`MIN_DEGREE`]
    pub fn new(degree: usize) -> Result<Self> {
        if degree < MIN_DEGREE {
            return Err(Error::InvalidConfiguration {
                degree,
                minimum: MIN_DEGREE,
            });
        }

        Ok(Self {
            degree,
            root: None,
            nodes: NodeArena::new(),
            len: 0,
            stats: TreeStats::new(),
        })
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Find the leaf responsible for `key`.
    ///
    /// The leaf is returned whether or not `key` is present, so it doubles
    /// as the starting point of a range scan. `None` only for an empty tree.
    pub fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root?;
        while let Node::NonLeaf(inner) = &self.nodes[current] {
            current = inner.child(key);
        }
        Some(current)
    }

    /// Find the parent of `node` by re-descending from the root along the
    /// route of the node's first key.
    ///
    /// Returns `None` if `node` is the root, is empty, or is not part of
    /// this tree.
    pub fn find_parent(&self, node: NodeId) -> Option<NodeId> {
        let key = self.nodes.first_key(node)?;
        self.find_parent_by(node, key)
    }

    /// Like [`find_parent`](Self::find_parent), routing by `key`, which
    /// must lie in `node`'s key range. Used once a deletion has emptied
    /// the node and it has no first key left.
    pub(super) fn find_parent_by(&self, node: NodeId, key: &K) -> Option<NodeId> {
        let mut current = self.root?;
        let mut depth = 0;
        while let Node::NonLeaf(inner) = &self.nodes[current] {
            let child = inner.child(key);
            if child == node {
                trace!(node = %node, parent = %current, depth, "parent found");
                return Some(current);
            }
            current = child;
            depth += 1;
        }
        None
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.nodes.leaf(self.find(key)?).get(key)
    }

    /// Get a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf = self.find(key)?;
        self.nodes.leaf_mut(leaf).get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    // ========================================================================
    // Public API: Insert
    // ========================================================================

    /// Insert `key` with `value`.
    ///
    /// Keys are unique: inserting an existing key replaces its value and
    /// returns the previous one, without any structural change.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let leaf_id = match self.find(&key) {
            Some(id) => id,
            None => {
                let id = self.nodes.allocate(Node::Leaf(LeafNode::new(self.degree)));
                self.root = Some(id);
                id
            }
        };

        let leaf = self.nodes.leaf_mut(leaf_id);
        let index = match leaf.position(&key) {
            Ok(index) => return Some(leaf.replace_value(index, value)),
            Err(index) => index,
        };

        let needs_split = !leaf.has_room();
        leaf.insert_at(index, key, value);
        self.len += 1;

        if needs_split {
            self.split_leaf(leaf_id);
        }
        None
    }

    // ========================================================================
    // Internal: Splits
    // ========================================================================

    /// Split a leaf that overflowed to `degree` entries.
    ///
    /// The first `⌈degree/2⌉` entries stay; the rest move to a new leaf
    /// spliced into the chain right after this one. The new leaf's first
    /// key becomes the separator in the parent.
    fn split_leaf(&mut self, leaf_id: NodeId) {
        let m = split_point(self.degree);

        let leaf = self.nodes.leaf_mut(leaf_id);
        let mut sibling = leaf.split_off(m);
        sibling.set_successor(leaf.successor());
        let separator = sibling.keys()[0].clone();

        let sibling_id = self.nodes.allocate(Node::Leaf(sibling));
        self.nodes.leaf_mut(leaf_id).set_successor(Some(sibling_id));

        self.stats.leaf_splits += 1;
        debug!(leaf = %leaf_id, sibling = %sibling_id, split_at = m, "leaf split");

        self.insert_in_parent(leaf_id, separator, sibling_id);
    }

    /// Register `new_node`, the right half of a split `node`, with the
    /// parent, using `key` as the separator between them.
    ///
    /// Splits the parent when it overflows and recurses upward; a split
    /// root is replaced by a fresh non-leaf root, growing the tree by one
    /// level.
    fn insert_in_parent(&mut self, node: NodeId, key: K, new_node: NodeId) {
        if self.root == Some(node) {
            let root = NonLeafNode::with_children(self.degree, key, node, new_node);
            let root_id = self.nodes.allocate(Node::NonLeaf(root));
            self.root = Some(root_id);

            self.stats.height_increases += 1;
            debug!(root = %root_id, height = self.height(), "root split, tree grew");
            return;
        }

        let parent_id = match self.find_parent(node) {
            Some(id) => id,
            None => panic!("{} is not the root but has no parent", node),
        };

        let parent = self.nodes.non_leaf_mut(parent_id);
        let needs_split = !parent.has_room();
        parent.insert_after(key, new_node, node);
        if !needs_split {
            return;
        }

        let (promoted, sibling) = parent.split_off(split_point(self.degree));
        let sibling_id = self.nodes.allocate(Node::NonLeaf(sibling));

        self.stats.non_leaf_splits += 1;
        debug!(node = %parent_id, sibling = %sibling_id, "non-leaf split");

        self.insert_in_parent(parent_id, promoted, sibling_id);
    }
}

impl<K: Ord + Clone, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            root: None,
            nodes: NodeArena::new(),
            len: 0,
            stats: TreeStats::new(),
        }
    }
}

impl<K: Ord + Clone, V> Extend<(K, V)> for BPlusTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for BPlusTree<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    /// Drain the leaves along the successor chain, in key order.
    fn into_iter(mut self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.len);
        let mut current = self.first_leaf();
        while let Some(id) = current {
            let leaf = self.nodes.leaf_mut(id);
            current = leaf.successor();
            entries.extend(leaf.clear());
        }
        entries.into_iter()
    }
}

impl<K: fmt::Debug, V> fmt::Display for BPlusTree<K, V> {
    /// Indented dump of the node hierarchy, one node per line.
    ///
    /// ```text
    /// NonLeaf Node(2) [30]
    ///   Leaf Node(0) [10, 20]
    ///   Leaf Node(1) [30, 40]
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return writeln!(f, "(empty)");
        };

        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match &self.nodes[id] {
                Node::Leaf(leaf) => writeln!(f, "{}Leaf {} {:?}", indent, id, leaf.keys())?,
                Node::NonLeaf(inner) => {
                    writeln!(f, "{}NonLeaf {} {:?}", indent, id, inner.keys())?;
                    for &child in inner.children().iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
        Ok(())
    }
}
