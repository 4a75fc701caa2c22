//! Leaf nodes: the key → value level of the tree.

use crate::common::config::max_keys;
use crate::common::NodeId;

/// A leaf node holding sorted keys with their values.
///
/// `keys[i]` is associated with `values[i]`. Leaves are chained through
/// `successor` in ascending key order; the chain is only used for
/// iteration, never for routing.
///
/// # Layout
/// ```text
/// ┌──────────────────────────────┐      ┌──────────────────────────────┐
/// │ keys:   [10]  [20]  [25]     │      │ keys:   [30]  [40]           │
/// │ values: [v10] [v20] [v25]    │ ───▶ │ values: [v30] [v40]          │ ───▶ None
/// │ successor: Some(Node(7))     │      │ successor: None              │
/// └──────────────────────────────┘      └──────────────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Maximum number of values this node may hold.
    degree: usize,

    /// Strictly ascending keys.
    keys: Vec<K>,

    /// Values, parallel to `keys`.
    values: Vec<V>,

    /// Next leaf in key order.
    successor: Option<NodeId>,
}

impl<K, V> LeafNode<K, V> {
    /// Create an empty leaf.
    ///
    /// Storage is reserved for `degree` entries: one more than the node may
    /// keep, so an insert can overflow in place right before a split.
    pub(crate) fn new(degree: usize) -> Self {
        Self {
            degree,
            keys: Vec::with_capacity(degree),
            values: Vec::with_capacity(degree),
            successor: None,
        }
    }

    /// Degree this leaf was created with.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Keys stored in this leaf, ascending.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values stored in this leaf, parallel to [`keys`](Self::keys).
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of populated key slots.
    pub fn number_of_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True if one more entry still fits within capacity.
    pub fn has_room(&self) -> bool {
        self.keys.len() < max_keys(self.degree)
    }

    /// Smallest key in this leaf.
    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    /// Largest key in this leaf.
    pub fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    /// Next leaf in ascending key order.
    pub fn successor(&self) -> Option<NodeId> {
        self.successor
    }

    pub(crate) fn set_successor(&mut self, successor: Option<NodeId>) {
        self.successor = successor;
    }

    /// Entry at `index`, if populated.
    pub fn entry(&self, index: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(index)?, self.values.get(index)?))
    }

    /// Iterate over this leaf's entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().zip(self.values.iter())
    }

    /// Shift-and-insert an entry at `index`.
    ///
    /// The caller has already located `index` with [`position`](Self::position).
    pub(crate) fn insert_at(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Append an entry after the current last one.
    pub(crate) fn push(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Replace the value at `index`, returning the previous one.
    pub(crate) fn replace_value(&mut self, index: usize, value: V) -> V {
        std::mem::replace(&mut self.values[index], value)
    }

    /// Remove and return the entry at `index`, shifting the rest left.
    pub(crate) fn remove_at(&mut self, index: usize) -> (K, V) {
        (self.keys.remove(index), self.values.remove(index))
    }

    /// Remove the smallest entry. Panics if the leaf is empty.
    pub(crate) fn pop_first(&mut self) -> (K, V) {
        self.remove_at(0)
    }

    /// Remove the largest entry. Panics if the leaf is empty.
    pub(crate) fn pop_last(&mut self) -> (K, V) {
        let index = self.keys.len() - 1;
        self.remove_at(index)
    }

    /// Move entries `[at, len)` into a new leaf with the same degree.
    ///
    /// The returned leaf is not linked; the caller splices it into the
    /// successor chain.
    pub(crate) fn split_off(&mut self, at: usize) -> Self {
        let mut sibling = Self::new(self.degree);
        sibling.keys.extend(self.keys.drain(at..));
        sibling.values.extend(self.values.drain(at..));
        sibling
    }

    /// Move every entry of `other` onto the end of this leaf.
    ///
    /// All keys in `other` must be greater than the keys in `self`.
    pub(crate) fn append(&mut self, other: &mut Self) {
        self.keys.append(&mut other.keys);
        self.values.append(&mut other.values);
    }

    /// Drain every entry out of this leaf, leaving it empty and unlinked.
    pub(crate) fn clear(&mut self) -> Vec<(K, V)> {
        self.successor = None;
        self.keys.drain(..).zip(self.values.drain(..)).collect()
    }
}

impl<K: Ord, V> LeafNode<K, V> {
    /// Binary search for `key`.
    ///
    /// `Ok(index)` if present, `Err(index)` with the sorted insertion point
    /// otherwise.
    pub fn position(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.position(key).ok()?;
        Some(&self.values[index])
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.position(key).ok()?;
        Some(&mut self.values[index])
    }

    /// Remove `key` and its value, shifting later entries left.
    pub(crate) fn delete(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.position(key).ok()?;
        Some(self.remove_at(index))
    }
}
