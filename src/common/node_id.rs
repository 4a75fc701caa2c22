//! Node identifier type.

use std::fmt;

/// Identifies a node slot in the tree's node arena.
///
/// Using `usize` because:
/// 1. Nodes are stored in a `Vec` inside the arena
/// 2. Direct indexing without casting: `slots[node_id.0]`
/// 3. Child and successor links stay `Copy` and never alias ownership
///
/// # Example
/// ```
/// use interchange_bptree::NodeId;
///
/// let node_id = NodeId::new(5);
/// assert_eq!(node_id.0, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
