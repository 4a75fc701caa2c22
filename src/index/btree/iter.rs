//! Ordered iteration along the leaf successor chain.

use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::common::NodeId;

use super::arena::NodeArena;
use super::leaf_node::LeafNode;
use super::tree::BPlusTree;

/// Position inside the leaf chain.
struct Cursor<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    leaf: Option<&'a LeafNode<K, V>>,
    index: usize,
}

impl<'a, K, V> Cursor<'a, K, V> {
    fn new(nodes: &'a NodeArena<K, V>, leaf: Option<NodeId>, index: usize) -> Self {
        Self {
            nodes,
            leaf: leaf.map(|id| nodes.leaf(id)),
            index,
        }
    }

    /// Entry under the cursor, skipping to the next leaf at a leaf's end.
    fn peek(&mut self) -> Option<(&'a K, &'a V)> {
        loop {
            let leaf = self.leaf?;
            if let Some(entry) = leaf.entry(self.index) {
                return Some(entry);
            }
            self.leaf = leaf.successor().map(|id| self.nodes.leaf(id));
            self.index = 0;
        }
    }

    fn advance(&mut self) {
        self.index += 1;
    }
}

/// Iterator over every entry of a [`BPlusTree`], in ascending key order.
///
/// Created by [`BPlusTree::iter`].
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    /// Entries not yet yielded.
    len: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let entry = self.cursor.peek()?;
        self.cursor.advance();
        self.len -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over the entries whose keys fall within a range.
///
/// Created by [`BPlusTree::range`]. The scan starts at the leaf returned by
/// [`BPlusTree::find`] and follows successors until the end bound.
pub struct Range<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    end: Bound<K>,
    done: bool,
}

impl<K: Ord, V> Range<'_, K, V> {
    fn before_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Included(end) => key <= end,
            Bound::Excluded(end) => key < end,
            Bound::Unbounded => true,
        }
    }
}

impl<'a, K: Ord, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.peek() {
            Some(entry) if self.before_end(entry.0) => {
                self.cursor.advance();
                Some(entry)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl<K: Ord, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> BPlusTree<K, V> {
    /// Iterate over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cursor: Cursor::new(&self.nodes, self.first_leaf(), 0),
            len: self.len,
        }
    }
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Iterate over the entries whose keys fall within `range`, in
    /// ascending key order.
    ///
    /// # Panics
    /// Panics if the start bound is greater than the end bound, or if both
    /// are equal and excluded.
    ///
    /// # Example
    /// ```
    /// use interchange_bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.extend((1..=10).map(|k| (k, k * k)));
    ///
    /// let keys: Vec<i32> = tree.range(3..6).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5]);
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        let start = range.start_bound();
        let end = range.end_bound();
        match (start, end) {
            (Bound::Excluded(s), Bound::Excluded(e)) if s == e => {
                panic!("range start and end are equal and excluded")
            }
            (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e))
                if s > e =>
            {
                panic!("range start is greater than range end")
            }
            _ => {}
        }

        let cursor = match start {
            Bound::Unbounded => Cursor::new(&self.nodes, self.first_leaf(), 0),
            Bound::Included(key) | Bound::Excluded(key) => {
                let leaf = self.find(key);
                let index = leaf.map_or(0, |id| {
                    let keys = self.nodes.leaf(id).keys();
                    match start {
                        Bound::Excluded(_) => keys.partition_point(|k| k <= key),
                        _ => keys.partition_point(|k| k < key),
                    }
                });
                Cursor::new(&self.nodes, leaf, index)
            }
        };

        Range {
            cursor,
            end: end.cloned(),
            done: false,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a BPlusTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(degree: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTree<i32, i32> {
        let mut tree = BPlusTree::new(degree).unwrap();
        for k in keys {
            tree.insert(k, -k);
        }
        tree
    }

    fn range_keys<R: RangeBounds<i32>>(tree: &BPlusTree<i32, i32>, range: R) -> Vec<i32> {
        tree.range(range).map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_iter_empty() {
        let tree = tree_with(4, []);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().len(), 0);
        assert_eq!(tree.range(..).next(), None);
    }

    #[test]
    fn test_iter_sorted() {
        let tree = tree_with(3, [50, 10, 40, 20, 30, 60, 5]);
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![5, 10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_iter_exact_size() {
        let tree = tree_with(4, 0..25);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 25);
        iter.next();
        iter.next();
        assert_eq!(iter.size_hint(), (23, Some(23)));
    }

    #[test]
    fn test_iter_values_follow_keys() {
        let tree = tree_with(4, 0..10);
        for (k, v) in &tree {
            assert_eq!(*v, -*k);
        }
    }

    #[test]
    fn test_iter_skips_emptied_positions_after_removal() {
        let mut tree = tree_with(4, 0..30);
        for k in (0..30).step_by(2) {
            tree.remove(&k);
        }
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (1..30).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_range_bounds() {
        let tree = tree_with(4, (0..20).map(|k| k * 10));

        assert_eq!(range_keys(&tree, 30..60), vec![30, 40, 50]);
        assert_eq!(range_keys(&tree, 30..=60), vec![30, 40, 50, 60]);
        assert_eq!(range_keys(&tree, 35..61), vec![40, 50, 60]);
        assert_eq!(range_keys(&tree, ..20), vec![0, 10]);
        assert_eq!(range_keys(&tree, 175..), vec![180, 190]);
        assert_eq!(range_keys(&tree, ..).len(), 20);
    }

    #[test]
    fn test_range_excluded_start() {
        let tree = tree_with(4, 0..10);
        let keys = range_keys(&tree, (Bound::Excluded(3), Bound::Included(6)));
        assert_eq!(keys, vec![4, 5, 6]);
    }

    #[test]
    fn test_range_outside_keys() {
        let tree = tree_with(4, 0..10);
        assert!(range_keys(&tree, 100..200).is_empty());
        assert!(range_keys(&tree, -10..0).is_empty());
        assert_eq!(range_keys(&tree, -10..1), vec![0]);
    }

    #[test]
    fn test_range_crosses_leaves() {
        let tree = tree_with(3, 0..100);
        assert_eq!(range_keys(&tree, 17..83), (17..83).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn test_range_inverted_panics() {
        let tree = tree_with(4, 0..10);
        let _ = tree.range(6..3);
    }

    #[test]
    fn test_range_is_fused() {
        let tree = tree_with(4, 0..10);
        let mut range = tree.range(0..2);
        assert!(range.next().is_some());
        assert!(range.next().is_some());
        assert!(range.next().is_none());
        assert!(range.next().is_none());
    }
}
