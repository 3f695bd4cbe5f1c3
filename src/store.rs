//! Storage abstraction for HAMT operations.

use safe_bump::{Checkpoint, Idx};

use crate::node::{self, Entry, Node};

/// Saved state of the two storage arenas.
pub struct StoreCheckpoint<K, V> {
    /// Entries arena checkpoint.
    pub entries: Checkpoint<Entry<K, V>>,
    /// Children arena checkpoint.
    pub children: Checkpoint<Node<K, V>>,
}

// StoreCheckpoint contains only Checkpoint<T> values (Copy), no K/V data.

impl<K, V> Clone for StoreCheckpoint<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for StoreCheckpoint<K, V> {}

/// Storage backend for HAMT nodes.
///
/// Abstracts over [`Arena`](safe_bump::Arena) (single-thread) and
/// [`SharedArena`](safe_bump::SharedArena) (multi-thread) backends. Both are
/// append-only, which is what lets every older root stay readable.
pub trait HamtStore<K, V> {
    /// The same backend holding values of type `W`.
    type Rebind<W>: HamtStore<K, W> + Default;

    /// Allocates a single entry, returning its index.
    fn alloc_entry(&mut self, entry: Entry<K, V>) -> Idx<Entry<K, V>>;

    /// Allocates a contiguous block of entries, returning the index of the
    /// first one. Returns `None` if the iterator is empty.
    fn alloc_entries(
        &mut self,
        iter: impl IntoIterator<Item = Entry<K, V>>,
    ) -> Option<Idx<Entry<K, V>>>;

    /// Returns a reference to the entry at `idx`.
    fn get_entry(&self, idx: Idx<Entry<K, V>>) -> &Entry<K, V>;

    /// Allocates a contiguous block of child nodes, returning the index of
    /// the first one. Returns `None` if the iterator is empty.
    fn alloc_children(
        &mut self,
        iter: impl IntoIterator<Item = Node<K, V>>,
    ) -> Option<Idx<Node<K, V>>>;

    /// Returns a reference to the child node at `idx`.
    fn get_child(&self, idx: Idx<Node<K, V>>) -> &Node<K, V>;

    /// Saves the current state of both arenas.
    fn checkpoint(&self) -> StoreCheckpoint<K, V>;

    /// Rolls back both arenas to a previous checkpoint.
    fn rollback(&mut self, cp: StoreCheckpoint<K, V>);

    /// Returns the total number of allocated items in each arena:
    /// `(entries, children)`.
    ///
    /// Includes dead path copies, so it reflects true memory footprint.
    fn arena_len(&self) -> (usize, usize);
}

/// Copies the child block of an internal node out of the store.
///
/// Returns an empty vector for tips.
pub fn read_children<K, V, S: HamtStore<K, V>>(store: &S, parent: Node<K, V>) -> Vec<Node<K, V>> {
    let (Node::Bitmap { children_start, .. } | Node::Array { children_start, .. }) = parent else {
        return Vec::new();
    };
    (0..parent.block_len())
        .map(|i| *store.get_child(node::offset(children_start, i)))
        .collect()
}
