//! Interchange B+-tree - an in-memory, order-preserving index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BPlusTree<K, V>                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │          Operations (index/btree/tree, delete)           │   │
//! │  │   find → insert/split ↑   remove → merge/redistribute ↑  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Nodes (index/btree/node)                 │   │
//! │  │        NonLeafNode: separators + child NodeIds           │   │
//! │  │        LeafNode: keys + values + successor link          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                NodeArena (index/btree/arena)             │   │
//! │  │       Vec<Option<Node>> + free list, NodeId = index      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - Index structures (B+-tree)
//!
//! # Quick Start
//! ```
//! use interchange_bptree::BPlusTree;
//!
//! let mut tree = BPlusTree::new(4).unwrap();
//! for k in [10, 20, 30, 40] {
//!     tree.insert(k, k * 100);
//! }
//!
//! // The fourth insert split the root leaf
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.get(&30), Some(&3000));
//!
//! let scanned: Vec<_> = tree.range(15..=30).map(|(k, _)| *k).collect();
//! assert_eq!(scanned, vec![20, 30]);
//!
//! assert!(tree.delete(&30, &3000));
//! tree.validate().unwrap();
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_DEGREE, MIN_DEGREE};
pub use common::{Error, NodeId, Result};

pub use index::btree::{BPlusTree, Iter, LeafNode, Node, NonLeafNode, Range, TreeStats};
