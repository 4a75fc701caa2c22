//! Structural statistics for a B+-tree.

use std::fmt;

/// Counters for every structural change the tree performs.
///
/// The tree is single-writer (`&mut self` on every mutation), so plain
/// counters are enough; no atomics.
///
/// # Example
/// ```
/// use interchange_bptree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// for k in [10, 20, 30, 40] {
///     tree.insert(k, ());
/// }
/// let stats = tree.stats();
/// assert_eq!(stats.leaf_splits, 1);
/// assert_eq!(stats.height_increases, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Overflowing leaves split in two.
    pub leaf_splits: u64,

    /// Overflowing non-leaf nodes split in two (one key promoted).
    pub non_leaf_splits: u64,

    /// Under-occupied nodes merged into a sibling.
    pub merges: u64,

    /// Single entries moved between siblings to restore occupancy.
    pub redistributions: u64,

    /// Root splits (height grew by one).
    pub height_increases: u64,

    /// Root collapses (height shrank by one).
    pub height_decreases: u64,
}

impl TreeStats {
    /// Create a stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits at either level.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.non_leaf_splits
    }

    /// Every split, merge and redistribution.
    pub fn structural_changes(&self) -> u64 {
        self.splits() + self.merges + self.redistributions
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ splits: {} (leaf: {}, non-leaf: {}), merges: {}, redistributions: {}, height: +{}/-{} }}",
            self.splits(),
            self.leaf_splits,
            self.non_leaf_splits,
            self.merges,
            self.redistributions,
            self.height_increases,
            self.height_decreases
        )
    }
}
