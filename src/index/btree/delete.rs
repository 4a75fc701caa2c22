//! Deletion and rebalancing.
//!
//! Removing an entry can leave a node under-occupied. The node then either
//! merges with an adjacent sibling (when both fit in one node) or borrows
//! a single entry from it. Merges remove a separator from the parent and
//! may cascade upward; the cascade ends at the root, which collapses once
//! it routes to a single child.
//!
//! ```text
//! Merge (degree 4, delete 30):
//!
//!        [30]                          [10 20]
//!       /    \          ──────▶        (root collapsed)
//!  [10 20]  [30]
//!
//! Redistribute (degree 5, delete 50):
//!
//!           [40]                            [35]
//!         /      \          ──────▶        /    \
//!  [10 20 30 35]  [40 50]           [10 20 30]  [35 40]
//! ```

use tracing::{debug, trace};

use crate::common::config::{max_keys, min_keys};
use crate::common::NodeId;

use super::node::Node;
use super::tree::BPlusTree;

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    // ========================================================================
    // Public API: Delete
    // ========================================================================

    /// Remove the entry stored under `key` if its value equals `value`.
    ///
    /// Returns `false`, leaving the tree untouched, when the key is absent
    /// or stored with a different value.
    pub fn delete(&mut self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        match self.get(key) {
            Some(stored) if stored == value => self.remove(key).is_some(),
            Some(_) => {
                trace!("delete skipped: stored value differs");
                false
            }
            None => false,
        }
    }

    /// Remove the entry stored under `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let leaf_id = self.find(key)?;
        let (_, value) = self.nodes.leaf_mut(leaf_id).delete(key)?;
        self.len -= 1;

        self.restore_occupancy(leaf_id, key);
        Some(value)
    }

    // ========================================================================
    // Internal: Rebalancing
    // ========================================================================

    /// Remove the separator `key` and the child to its right from `node`,
    /// then rebalance.
    fn delete_entry(&mut self, node: NodeId, key: &K) {
        let removed = self.nodes[node].delete(key);
        assert!(removed, "separator missing from {}", node);

        self.restore_occupancy(node, key);
    }

    /// Bring `node` back to legal occupancy after a removal.
    ///
    /// `key` is the key just removed from `node`; it still routes from the
    /// root to `node` and is used to find the parent even when `node` has
    /// been emptied.
    fn restore_occupancy(&mut self, node: NodeId, key: &K) {
        if self.root == Some(node) {
            self.collapse_root(node);
            return;
        }

        let occupancy = self.nodes[node].number_of_keys();
        if occupancy >= min_keys(self.degree) {
            return;
        }

        let parent_id = match self.find_parent_by(node, key) {
            Some(id) => id,
            None => panic!("{} is not the root but has no parent", node),
        };
        let parent = self.nodes.non_leaf(parent_id);
        let position = match parent.position_of(node) {
            Some(position) => position,
            None => panic!("{} is not a child of {}", node, parent_id),
        };

        // Left neighbour unless the node is the first child.
        let (sibling, separator_index, sibling_is_left) = if position == 0 {
            (parent.children()[1], 0, false)
        } else {
            (parent.children()[position - 1], position - 1, true)
        };

        let sibling_node = &self.nodes[sibling];
        let combined = occupancy + sibling_node.number_of_keys();
        // A non-leaf merge also pulls the separator down.
        let merged_keys = if sibling_node.is_leaf() {
            combined
        } else {
            combined + 1
        };

        trace!(
            node = %node,
            sibling = %sibling,
            occupancy,
            combined,
            "node under-occupied"
        );

        if merged_keys <= max_keys(self.degree) {
            let (left, right) = if sibling_is_left {
                (sibling, node)
            } else {
                (node, sibling)
            };
            let separator = parent.keys()[separator_index].clone();
            self.merge(parent_id, left, right, separator);
        } else {
            self.redistribute(parent_id, node, sibling, separator_index, sibling_is_left);
        }
    }

    /// Fold `right` into `left`, its neighbour in key order, then drop the
    /// separator between them from `parent`.
    fn merge(&mut self, parent: NodeId, left: NodeId, right: NodeId, separator: K) {
        let right_node = self.nodes.free(right);

        match (&mut self.nodes[left], right_node) {
            (Node::Leaf(into), Node::Leaf(mut from)) => {
                into.append(&mut from);
                into.set_successor(from.successor());
            }
            (Node::NonLeaf(into), Node::NonLeaf(mut from)) => {
                into.append(separator.clone(), &mut from);
            }
            _ => panic!("cannot merge {} and {}: siblings at different levels", left, right),
        }

        self.stats.merges += 1;
        debug!(left = %left, right = %right, parent = %parent, "nodes merged");

        self.delete_entry(parent, &separator);
    }

    /// Move one entry across the boundary from `sibling` into `node` and
    /// rewrite the separator between them.
    fn redistribute(
        &mut self,
        parent: NodeId,
        node: NodeId,
        sibling: NodeId,
        separator_index: usize,
        sibling_is_left: bool,
    ) {
        let separator = self.nodes.non_leaf(parent).keys()[separator_index].clone();

        let new_separator = match self.nodes.pair_mut(node, sibling) {
            (Node::Leaf(target), Node::Leaf(donor)) => {
                if sibling_is_left {
                    let (key, value) = donor.pop_last();
                    let boundary = key.clone();
                    target.insert_at(0, key, value);
                    boundary
                } else {
                    let (key, value) = donor.pop_first();
                    target.push(key, value);
                    match donor.first_key() {
                        Some(first) => first.clone(),
                        None => panic!("{} emptied by redistribution", sibling),
                    }
                }
            }
            (Node::NonLeaf(target), Node::NonLeaf(donor)) => {
                if sibling_is_left {
                    let (key, child) = donor.pop_last();
                    target.push_front(separator, child);
                    key
                } else {
                    let (key, child) = donor.pop_first();
                    target.push_back(separator, child);
                    key
                }
            }
            _ => panic!(
                "cannot redistribute between {} and {}: siblings at different levels",
                node, sibling
            ),
        };

        self.nodes
            .non_leaf_mut(parent)
            .replace_key(separator_index, new_separator);

        self.stats.redistributions += 1;
        debug!(node = %node, donor = %sibling, parent = %parent, "entry redistributed");
    }

    /// Shrink the tree at the root.
    ///
    /// A non-leaf root left without separators is replaced by its only
    /// child; an emptied leaf root leaves the tree empty.
    fn collapse_root(&mut self, root: NodeId) {
        let new_root = match &self.nodes[root] {
            Node::NonLeaf(inner) if inner.number_of_keys() == 0 => Some(inner.children()[0]),
            Node::Leaf(leaf) if leaf.is_empty() => None,
            _ => return,
        };

        self.nodes.free(root);
        self.root = new_root;

        match new_root {
            Some(child) => {
                self.stats.height_decreases += 1;
                debug!(old_root = %root, new_root = %child, "root collapsed, tree shrank");
            }
            None => debug!(old_root = %root, "last entry removed, tree empty"),
        }
    }
}
