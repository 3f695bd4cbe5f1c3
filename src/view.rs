//! Read-only access to one version of a map.

use std::fmt;
use std::hash::Hash;

use crate::error::HamtError;
use crate::hash;
use crate::iter::Iter;
use crate::node::Node;
use crate::ops::lookup::lookup_node;
use crate::ops::transform;
use crate::store::HamtStore;

/// Borrowed, read-only view of one map version.
///
/// Obtained from [`HamtMap::version`](crate::HamtMap::version) for a saved
/// checkpoint. Because updates never touch existing nodes, a view of an
/// older version keeps answering with that version's contents while the
/// map moves on.
pub struct HamtView<'a, K, V, S> {
    store: &'a S,
    root: Node<K, V>,
    size: usize,
}

impl<'a, K, V, S> HamtView<'a, K, V, S> {
    pub(crate) const fn new(store: &'a S, root: Node<K, V>, size: usize) -> Self {
        Self { store, root, size }
    }

    /// Returns the number of key-value pairs in this version.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if this version has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl<'a, K: Hash + Eq + 'a, V: 'a, S: HamtStore<K, V>> HamtView<'a, K, V, S> {
    /// Returns a reference to the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&'a V> {
        lookup_node(self.store, self.root, 0, hash::hash_one(key), key)
    }

    /// Strict lookup.
    ///
    /// # Errors
    ///
    /// Returns [`HamtError::KeyNotFound`] if `key` is not bound.
    pub fn lookup(&self, key: &K) -> Result<&'a V, HamtError> {
        self.get(key).ok_or(HamtError::KeyNotFound)
    }

    /// Returns `true` if `key` is bound in this version.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<'a, K, V, S: HamtStore<K, V>> HamtView<'a, K, V, S> {
    /// Returns an iterator over `(&K, &V)` pairs in trie order.
    #[must_use]
    pub fn iter(&self) -> Iter<'a, K, V> {
        Iter::new(self.store, self.root)
    }

    /// Collects all pairs in trie order.
    #[must_use]
    pub fn to_list(&self) -> Vec<(&'a K, &'a V)> {
        self.iter().collect()
    }

    /// Counts the pairs by walking the trie instead of reading the cached size.
    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        transform::number_of_elements(self.store, self.root)
    }
}

impl<K, V, S> Clone for HamtView<'_, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, S> Copy for HamtView<'_, K, V, S> {}

impl<K, V, S> fmt::Debug for HamtView<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtView")
            .field("len", &self.size)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
