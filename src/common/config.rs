//! Configuration constants for the B+-tree index.

/// Smallest degree a tree accepts.
///
/// With a degree of 2 a split leaves a node with zero keys on one side,
/// so the minimum-occupancy rule can never be satisfied.
pub const MIN_DEGREE: usize = 3;

/// Degree used by [`BPlusTree::default`](crate::BPlusTree).
pub const DEFAULT_DEGREE: usize = 4;

/// Maximum number of keys a node of `degree` may hold.
#[inline]
pub const fn max_keys(degree: usize) -> usize {
    degree - 1
}

/// Minimum number of keys a non-root node of `degree` must hold.
///
/// This is the canonical `⌈degree/2⌉ − 1` occupancy rule.
#[inline]
pub const fn min_keys(degree: usize) -> usize {
    split_point(degree) - 1
}

/// Split point `m = ⌈degree/2⌉` used by both split paths.
///
/// # Split Layout
/// ```text
/// leaf (degree entries):      [0 .. m) stay | [m .. degree) move right
/// non-leaf (degree keys):     [0 .. m-1) stay | m-1 promoted | [m .. degree) move right
/// ```
#[inline]
pub const fn split_point(degree: usize) -> usize {
    degree.div_ceil(2)
}
