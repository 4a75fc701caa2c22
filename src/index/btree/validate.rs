//! Structural self-check.

use crate::common::config::{max_keys, min_keys};
use crate::common::{Error, NodeId, Result};

use super::node::Node;
use super::tree::BPlusTree;

/// Running state of one validation pass.
struct Walk<'a, K> {
    /// Leaves in left-to-right recursion order.
    leaves: Vec<NodeId>,
    /// Depth of the first leaf reached.
    leaf_depth: Option<usize>,
    /// Nodes visited.
    visited: usize,
    /// Last leaf key seen, for strict ordering across leaves.
    previous: Option<&'a K>,
}

fn violation(message: String) -> Error {
    Error::InvariantViolation(message)
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Check every structural invariant of the tree.
    ///
    /// Checks occupancy bounds, child counts, key ordering within and
    /// across nodes, routing ranges, equal leaf depth, the successor chain
    /// and the entry count. Cost is linear in the size of the tree.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first broken invariant
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.len != 0 || self.nodes.len() != 0 {
                return Err(violation(format!(
                    "empty tree holds {} entries in {} nodes",
                    self.len,
                    self.nodes.len()
                )));
            }
            return Ok(());
        };

        let mut walk = Walk {
            leaves: Vec::new(),
            leaf_depth: None,
            visited: 0,
            previous: None,
        };
        self.validate_node(root, 0, None, None, &mut walk)?;

        if walk.visited != self.nodes.len() {
            return Err(violation(format!(
                "{} nodes reachable but {} allocated",
                walk.visited,
                self.nodes.len()
            )));
        }

        self.validate_chain(&walk.leaves)
    }

    /// Validate the subtree at `id`, whose keys must lie in `[lower, upper)`.
    fn validate_node<'a>(
        &'a self,
        id: NodeId,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        walk: &mut Walk<'a, K>,
    ) -> Result<()> {
        let node = match self.nodes.get(id) {
            Some(node) => node,
            None => return Err(violation(format!("{} is referenced but not live", id))),
        };
        walk.visited += 1;

        if node.degree() != self.degree {
            return Err(violation(format!(
                "{} has degree {}, tree has {}",
                id,
                node.degree(),
                self.degree
            )));
        }

        let is_root = Some(id) == self.root;
        let keys = node.keys();
        if keys.len() > max_keys(self.degree) {
            return Err(violation(format!("{} overflows with {} keys", id, keys.len())));
        }
        if !is_root && keys.len() < min_keys(self.degree) {
            return Err(violation(format!("{} underflows with {} keys", id, keys.len())));
        }
        if keys.is_empty() {
            return Err(violation(format!("{} is empty", id)));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(violation(format!("{} keys are not strictly ascending", id)));
        }

        let in_range = |key: &K| {
            !matches!(lower, Some(lower) if key < lower)
                && !matches!(upper, Some(upper) if key >= upper)
        };
        if !keys.iter().all(in_range) {
            return Err(violation(format!("{} holds keys outside its routing range", id)));
        }

        match node {
            Node::Leaf(leaf) => {
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(violation(format!(
                            "{} at depth {}, other leaves at depth {}",
                            id, depth, expected
                        )));
                    }
                    Some(_) => {}
                }

                if let (Some(previous), Some(first)) = (walk.previous, leaf.first_key()) {
                    if previous >= first {
                        return Err(violation(format!("{} overlaps its left neighbour", id)));
                    }
                }
                walk.previous = leaf.last_key();
                walk.leaves.push(id);
            }
            Node::NonLeaf(inner) => {
                let children = inner.children();
                if children.len() != keys.len() + 1 {
                    return Err(violation(format!(
                        "{} has {} keys but {} children",
                        id,
                        keys.len(),
                        children.len()
                    )));
                }

                for (i, &child) in children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&keys[i - 1]) };
                    let child_upper = if i == keys.len() { upper } else { Some(&keys[i]) };
                    self.validate_node(child, depth + 1, child_lower, child_upper, walk)?;
                }
            }
        }

        Ok(())
    }

    /// The successor chain must visit exactly the leaves found by recursion,
    /// in the same order, and hold `len` entries.
    fn validate_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let mut chain = Vec::with_capacity(leaves.len());
        let mut entries = 0;
        let mut current = self.first_leaf();
        while let Some(id) = current {
            if chain.len() > leaves.len() {
                return Err(violation("successor chain does not terminate".to_string()));
            }
            let leaf = match self.nodes.get(id).and_then(Node::as_leaf) {
                Some(leaf) => leaf,
                None => return Err(violation(format!("successor {} is not a leaf", id))),
            };
            chain.push(id);
            entries += leaf.number_of_keys();
            current = leaf.successor();
        }

        if chain != leaves {
            return Err(violation(format!(
                "successor chain {:?} differs from leaf order {:?}",
                chain, leaves
            )));
        }
        if entries != self.len {
            return Err(violation(format!(
                "leaves hold {} entries, tree reports {}",
                entries, self.len
            )));
        }
        Ok(())
    }
}
