//! Arena-backed storage (single-threaded).

use safe_bump::{Arena, Idx};

use crate::node::{Entry, Node};
use crate::store::{HamtStore, StoreCheckpoint};

/// Storage backend using two [`Arena`]s.
pub struct HamtArena<K, V> {
    entries: Arena<Entry<K, V>>,
    children: Arena<Node<K, V>>,
}

impl<K, V> HamtArena<K, V> {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Arena::new(),
            children: Arena::new(),
        }
    }
}

impl<K, V> Default for HamtArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HamtStore<K, V> for HamtArena<K, V> {
    type Rebind<W> = HamtArena<K, W>;

    fn alloc_entry(&mut self, entry: Entry<K, V>) -> Idx<Entry<K, V>> {
        self.entries.alloc(entry)
    }

    fn alloc_entries(
        &mut self,
        iter: impl IntoIterator<Item = Entry<K, V>>,
    ) -> Option<Idx<Entry<K, V>>> {
        self.entries.alloc_extend(iter)
    }

    fn get_entry(&self, idx: Idx<Entry<K, V>>) -> &Entry<K, V> {
        self.entries.get(idx)
    }

    fn alloc_children(
        &mut self,
        iter: impl IntoIterator<Item = Node<K, V>>,
    ) -> Option<Idx<Node<K, V>>> {
        self.children.alloc_extend(iter)
    }

    fn get_child(&self, idx: Idx<Node<K, V>>) -> &Node<K, V> {
        self.children.get(idx)
    }

    fn checkpoint(&self) -> StoreCheckpoint<K, V> {
        StoreCheckpoint {
            entries: self.entries.checkpoint(),
            children: self.children.checkpoint(),
        }
    }

    fn rollback(&mut self, cp: StoreCheckpoint<K, V>) {
        self.entries.rollback(cp.entries);
        self.children.rollback(cp.children);
    }

    fn arena_len(&self) -> (usize, usize) {
        (self.entries.len(), self.children.len())
    }
}
