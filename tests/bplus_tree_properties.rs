//! B+-tree Property Tests
//!
//! Random operation sequences checked against `std::collections::BTreeMap`,
//! with a full structural validation after every step.

use std::collections::BTreeMap;

use interchange_bptree::BPlusTree;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Delete(u16, u32),
}

fn op() -> impl Strategy<Value = Op> {
    // Narrow key space so removals hit existing keys often
    prop_oneof![
        3 => (0u16..200, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0u16..200).prop_map(Op::Remove),
        1 => (0u16..200, any::<u32>()).prop_map(|(k, v)| Op::Delete(k, v)),
    ]
}

fn apply(tree: &mut BPlusTree<u16, u32>, model: &mut BTreeMap<u16, u32>, op: &Op) {
    match *op {
        Op::Insert(k, v) => {
            assert_eq!(tree.insert(k, v), model.insert(k, v));
        }
        Op::Remove(k) => {
            assert_eq!(tree.remove(&k), model.remove(&k));
        }
        Op::Delete(k, v) => {
            let expected = model.get(&k) == Some(&v);
            if expected {
                model.remove(&k);
            }
            assert_eq!(tree.delete(&k, &v), expected);
        }
    }
}

proptest! {
    #[test]
    fn prop_matches_btreemap(degree in 3usize..9, ops in prop::collection::vec(op(), 0..400)) {
        let mut tree = BPlusTree::new(degree).unwrap();
        let mut model = BTreeMap::new();

        for op in &ops {
            apply(&mut tree, &mut model, op);
            prop_assert!(tree.validate().is_ok(), "{:?} after {:?}", tree.validate(), op);
            prop_assert_eq!(tree.len(), model.len());
        }

        let entries: Vec<(u16, u32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    #[test]
    fn prop_find_routes_to_containing_leaf(
        degree in 3usize..9,
        keys in prop::collection::btree_set(any::<i64>(), 1..300),
    ) {
        let mut tree = BPlusTree::new(degree).unwrap();
        tree.extend(keys.iter().map(|&k| (k, ())));

        for k in &keys {
            let leaf = tree.find(k).unwrap();
            prop_assert_eq!(tree.find(k), Some(leaf));
            let node = tree.node(leaf).unwrap();
            prop_assert!(node.is_leaf());
            prop_assert!(node.keys().contains(k));
        }
    }

    #[test]
    fn prop_iteration_is_sorted(
        degree in 3usize..9,
        keys in prop::collection::vec(any::<i32>(), 0..300),
    ) {
        let mut tree = BPlusTree::new(degree).unwrap();
        for &k in &keys {
            tree.insert(k, k);
        }

        let scanned: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        prop_assert!(scanned.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(scanned.len(), tree.len());
    }

    #[test]
    fn prop_range_matches_btreemap(
        keys in prop::collection::btree_set(0i32..1000, 0..200),
        a in 0i32..1000,
        b in 0i32..1000,
    ) {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let mut tree = BPlusTree::new(4).unwrap();
        let model: BTreeMap<i32, ()> = keys.iter().map(|&k| (k, ())).collect();
        tree.extend(keys.iter().map(|&k| (k, ())));

        let got: Vec<i32> = tree.range(start..end).map(|(k, _)| *k).collect();
        let want: Vec<i32> = model.range(start..end).map(|(k, _)| *k).collect();
        prop_assert_eq!(got, want);

        let got: Vec<i32> = tree.range(start..=end).map(|(k, _)| *k).collect();
        let want: Vec<i32> = model.range(start..=end).map(|(k, _)| *k).collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_round_trip_to_empty(
        degree in 3usize..9,
        keys in prop::collection::hash_set(any::<u32>(), 0..300),
    ) {
        let mut tree = BPlusTree::new(degree).unwrap();
        for &k in &keys {
            tree.insert(k, k);
        }
        for k in &keys {
            prop_assert!(tree.delete(k, k));
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.root(), None);
        prop_assert!(tree.validate().is_ok());
    }
}
