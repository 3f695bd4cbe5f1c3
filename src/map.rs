//! Persistent HAMT map.

use std::fmt;
use std::hash::Hash;
use std::ops;

use crate::HamtCheckpoint;
use crate::arena::HamtArena;
use crate::arena_sync::HamtArenaSync;
use crate::error::HamtError;
use crate::hash;
use crate::iter::Iter;
use crate::node::Node;
use crate::ops::alter::{Change, alter_node};
use crate::ops::transform;
use crate::store::HamtStore;
use crate::view::HamtView;

/// Persistent hash map over a hash array mapped trie.
///
/// Every update rebuilds only the path from the root to the altered entry;
/// the rest of the trie is shared with the previous version, which stays
/// readable through [`checkpoint`](Self::checkpoint) and
/// [`version`](Self::version).
///
/// # Memory
///
/// The arenas are append-only: each update leaves its replaced path behind
/// as dead blocks, so re-inserting one key `n` times grows the entries arena
/// by `n`. Space is reclaimed only by [`rollback`](Self::rollback) or by
/// copying the live trie into a fresh store with [`compact`](Self::compact).
pub struct HamtMap<K, V, S = HamtArena<K, V>> {
    store: S,
    root: Node<K, V>,
    size: usize,
    /// Arena lengths restored by each rollback, oldest first.
    rollbacks: Vec<(usize, usize)>,
}

/// [`HamtMap`] backed by [`HamtArenaSync`], `Send + Sync`.
pub type HamtMapSync<K, V> = HamtMap<K, V, HamtArenaSync<K, V>>;

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_store(HamtArena::new())
    }
}

impl<K, V, S> HamtMap<K, V, S> {
    /// Creates an empty map on the given store.
    #[must_use]
    pub const fn with_store(store: S) -> Self {
        Self {
            store,
            root: Node::Empty,
            size: 0,
            rollbacks: Vec::new(),
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

impl<K, V, S: HamtStore<K, V>> HamtMap<K, V, S> {
    /// Saves the current version for later reads or rollback.
    #[must_use]
    pub fn checkpoint(&self) -> HamtCheckpoint<K, V> {
        HamtCheckpoint {
            store: self.store.checkpoint(),
            root: self.root,
            size: self.size,
            epoch: self.rollbacks.len(),
            arena_len: self.store.arena_len(),
        }
    }

    /// Restores a previously saved version.
    ///
    /// All changes made after the checkpoint are discarded, and checkpoints
    /// taken after it become stale.
    ///
    /// # Errors
    ///
    /// Returns [`HamtError::StaleCheckpoint`] if an earlier rollback already
    /// discarded part of `cp`'s version. The map is left untouched.
    pub fn rollback(&mut self, cp: HamtCheckpoint<K, V>) -> Result<(), HamtError> {
        if !self.is_live(&cp) {
            return Err(HamtError::StaleCheckpoint);
        }
        self.store.rollback(cp.store);
        self.root = cp.root;
        self.size = cp.size;
        self.rollbacks.push(cp.arena_len);
        Ok(())
    }

    /// Read-only view of the version saved in `cp`.
    ///
    /// # Errors
    ///
    /// Returns [`HamtError::StaleCheckpoint`] if a rollback has discarded
    /// arena space that `cp`'s version lives in.
    pub fn version(&self, cp: &HamtCheckpoint<K, V>) -> Result<HamtView<'_, K, V, S>, HamtError> {
        if !self.is_live(cp) {
            return Err(HamtError::StaleCheckpoint);
        }
        Ok(HamtView::new(&self.store, cp.root, cp.size))
    }

    /// `true` while every block of `cp`'s version is still in the arenas.
    ///
    /// Arena lengths only grow between rollbacks, so `cp` survives exactly
    /// when no rollback since it was taken truncated below its lengths.
    fn is_live(&self, cp: &HamtCheckpoint<K, V>) -> bool {
        let (entries, children) = cp.arena_len;
        let (cur_entries, cur_children) = self.store.arena_len();
        let Some(later) = self.rollbacks.get(cp.epoch..) else {
            return false;
        };
        entries <= cur_entries
            && children <= cur_children
            && later.iter().all(|&(e, c)| e >= entries && c >= children)
    }

    /// Returns the total number of allocated items in each arena:
    /// `(entries, children)`.
    ///
    /// Includes dead path copies, so it reflects true memory footprint.
    #[must_use]
    pub fn arena_len(&self) -> (usize, usize) {
        self.store.arena_len()
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Node<K, V> {
        self.root
    }

    #[cfg(test)]
    pub(crate) const fn store(&self) -> &S {
        &self.store
    }

    const fn view(&self) -> HamtView<'_, K, V, S> {
        HamtView::new(&self.store, self.root, self.size)
    }
}

// ---------------------------------------------------------------------------
// Read operations: K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V, S: HamtStore<K, V>> HamtMap<K, V, S> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.view().get(key)
    }

    /// Strict lookup.
    ///
    /// # Errors
    ///
    /// Returns [`HamtError::KeyNotFound`] if `key` is not bound.
    pub fn lookup(&self, key: &K) -> Result<&V, HamtError> {
        self.view().lookup(key)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations: K: Hash + Eq + Clone, V: Clone
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Clone, S: HamtStore<K, V>> HamtMap<K, V, S> {
    /// Applies `f` to the current value of `key` (`None` if absent) and
    /// stores the result, removing the key when `f` returns `None`.
    ///
    /// Returns what happened to the binding.
    pub fn alter<F>(&mut self, key: K, f: F) -> Change
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let hash = hash::hash_one(&key);
        let outcome = alter_node(&mut self.store, self.root, 0, hash, key, f);
        match outcome.change {
            Change::Added => self.size += 1,
            Change::Removed => self.size -= 1,
            Change::Modified | Change::Unchanged => {}
        }
        self.root = outcome.node;
        outcome.change
    }

    /// Inserts a key-value pair, replacing any previous value.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut old = None;
        self.alter(key, |current| {
            old = current.cloned();
            Some(value)
        });
        old
    }

    /// Inserts `value`, or `combine(value, &old)` if `key` is already bound.
    pub fn insert_with<F>(&mut self, key: K, value: V, combine: F) -> Change
    where
        F: FnOnce(V, &V) -> V,
    {
        self.alter(key, |current| {
            Some(match current {
                Some(old) => combine(value, old),
                None => value,
            })
        })
    }

    /// Removes a key from the map. Returns the removed value, or `None` if
    /// the key was not present.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let mut removed = None;
        self.alter(key.clone(), |current| {
            removed = current.cloned();
            None
        });
        removed
    }

    /// Replaces the value of `key` with `f(value)`, or removes the key when
    /// `f` returns `None`. Absent keys are left alone.
    pub fn update<F>(&mut self, key: &K, f: F) -> Change
    where
        F: FnOnce(&V) -> Option<V>,
    {
        self.alter(key.clone(), |current| current.and_then(f))
    }

    /// Like [`update`](Self::update), with the key passed to `f`.
    pub fn update_with_key<F>(&mut self, key: &K, f: F) -> Change
    where
        F: FnOnce(&K, &V) -> Option<V>,
    {
        self.alter(key.clone(), |current| current.and_then(|v| f(key, v)))
    }

    /// Replaces the value of `key` with `f(value)` if present.
    pub fn adjust<F>(&mut self, key: &K, f: F) -> Change
    where
        F: FnOnce(&V) -> V,
    {
        self.alter(key.clone(), |current| current.map(f))
    }

    /// Returns a new map holding the pairs for which `pred(key, value)` holds.
    #[must_use]
    pub fn filter_with_key<P>(&self, mut pred: P) -> Self
    where
        S: Default,
        P: FnMut(&K, &V) -> bool,
    {
        let mut store = S::default();
        let root = transform::filter_node(&self.store, &mut store, self.root, &mut pred);
        let size = transform::number_of_elements(&store, root);
        Self {
            store,
            root,
            size,
            rollbacks: Vec::new(),
        }
    }

    /// Copies the live trie into a fresh store, dropping every dead path
    /// copy. The result has the same shape and contents.
    ///
    /// Checkpoints of this map do not apply to the copy.
    #[must_use]
    pub fn compact(&self) -> Self
    where
        S: Default,
    {
        let mut store = S::default();
        let root = transform::map_node(&self.store, &mut store, self.root, &mut |_: &K, v: &V| {
            v.clone()
        });
        Self {
            store,
            root,
            size: self.size,
            rollbacks: Vec::new(),
        }
    }

    /// Returns a new map holding the pairs whose value satisfies `pred`.
    #[must_use]
    pub fn filter<P>(&self, mut pred: P) -> Self
    where
        S: Default,
        P: FnMut(&V) -> bool,
    {
        self.filter_with_key(|_, v| pred(v))
    }
}

// ---------------------------------------------------------------------------
// Structural transforms & traversal
// ---------------------------------------------------------------------------

impl<K, V, S: HamtStore<K, V>> HamtMap<K, V, S> {
    /// Returns a new map with every value replaced by `f(key, value)`.
    ///
    /// The new trie has the same shape as this one.
    #[must_use]
    pub fn map_with_key<W, F>(&self, mut f: F) -> HamtMap<K, W, S::Rebind<W>>
    where
        K: Clone,
        F: FnMut(&K, &V) -> W,
    {
        let mut store = <S::Rebind<W> as Default>::default();
        let root = transform::map_node(&self.store, &mut store, self.root, &mut f);
        HamtMap {
            store,
            root,
            size: self.size,
            rollbacks: Vec::new(),
        }
    }

    /// Returns a new map with every value replaced by `f(value)`.
    #[must_use]
    pub fn map<W, F>(&self, mut f: F) -> HamtMap<K, W, S::Rebind<W>>
    where
        K: Clone,
        F: FnMut(&V) -> W,
    {
        self.map_with_key(|_, v| f(v))
    }

    /// Returns an iterator over `(&K, &V)` pairs in trie order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.store, self.root)
    }

    /// Collects all pairs in trie order.
    #[must_use]
    pub fn to_list(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Collects all keys in trie order.
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Collects all values in trie order.
    #[must_use]
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Collects all pairs sorted by key.
    #[must_use]
    pub fn to_ascending_list(&self) -> Vec<(&K, &V)>
    where
        K: Ord,
    {
        let mut pairs = self.to_list();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Folds values in trie order.
    pub fn fold_left<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &V) -> B,
    {
        self.iter().fold(init, |acc, (_, v)| f(acc, v))
    }

    /// Folds values in reverse trie order, `f(value, acc)`.
    pub fn fold_right<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(&V, B) -> B,
    {
        self.iter().rev().fold(init, |acc, (_, v)| f(v, acc))
    }

    /// Folds pairs in trie order.
    pub fn fold_left_with_key<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &K, &V) -> B,
    {
        self.iter().fold(init, |acc, (k, v)| f(acc, k, v))
    }

    /// Folds pairs in reverse trie order, `f(key, value, acc)`.
    pub fn fold_right_with_key<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(&K, &V, B) -> B,
    {
        self.iter().rev().fold(init, |acc, (k, v)| f(k, v, acc))
    }

    /// Counts the pairs by walking the trie instead of reading the cached size.
    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        self.view().number_of_elements()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, S: Default> Default for HamtMap<K, V, S> {
    fn default() -> Self {
        Self::with_store(S::default())
    }
}

impl<K, V, S> fmt::Debug for HamtMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtMap")
            .field("len", &self.size)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<K, V, S, T> PartialEq<HamtMap<K, V, T>> for HamtMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: HamtStore<K, V>,
    T: HamtStore<K, V>,
{
    fn eq(&self, other: &HamtMap<K, V, T>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq, V: Eq, S: HamtStore<K, V>> Eq for HamtMap<K, V, S> {}

impl<K: Hash + Eq + Clone, V: Clone, S: HamtStore<K, V>> Extend<(K, V)> for HamtMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HamtMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: HamtStore<K, V> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V, S: HamtStore<K, V>> ops::Index<&K> for HamtMap<K, V, S> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V, S: HamtStore<K, V>> IntoIterator for &'a HamtMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
