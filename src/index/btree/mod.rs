//! B+-tree index.
//!
//! An ordered map whose values live only in the leaves. Leaves are chained
//! left to right for range scans; non-leaf nodes hold separator keys that
//! route a lookup to exactly one child per level.
//!
//! # Components
//! - [`BPlusTree`] - The tree: lookup, insert/split, delete/merge
//! - [`Node`] - Closed sum of [`LeafNode`] and [`NonLeafNode`]
//! - [`Iter`] / [`Range`] - Ordered iteration along the leaf chain
//! - [`TreeStats`] - Structural-change counters

mod arena;
mod delete;
mod iter;
mod leaf_node;
mod node;
mod non_leaf_node;
mod stats;
mod tree;
mod validate;

pub use iter::{Iter, Range};
pub use leaf_node::LeafNode;
pub use node::Node;
pub use non_leaf_node::NonLeafNode;
pub use stats::TreeStats;
pub use tree::BPlusTree;
