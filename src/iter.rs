//! Iterator types for HAMT maps.

use crate::node::{self, Entry, Node};
use crate::store::{self, HamtStore};

/// Iterator over references to key-value pairs of a map version.
///
/// Pairs come in trie pre-order: children left to right, collision pairs
/// in stored order.
pub struct Iter<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    pos: usize,
    end: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Creates an iterator by collecting all entries below `root` via DFS.
    pub fn new<S: HamtStore<K, V>>(store: &'a S, root: Node<K, V>) -> Self {
        let mut entries = Vec::new();
        collect(store, root, &mut entries);
        let end = entries.len();
        Self {
            entries,
            pos: 0,
            end,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.end {
            let item = self.entries[self.pos];
            self.pos += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.pos;
        (remaining, Some(remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.pos < self.end {
            self.end -= 1;
            Some(self.entries[self.end])
        } else {
            None
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// DFS collect all `(&K, &V)` from the subtree rooted at `node`.
fn collect<'a, K, V, S: HamtStore<K, V>>(
    store: &'a S,
    node: Node<K, V>,
    out: &mut Vec<(&'a K, &'a V)>,
) {
    match node {
        Node::Empty => {}
        Node::Leaf { entry, .. } => {
            let e: &'a Entry<K, V> = store.get_entry(entry);
            out.push((&e.key, &e.value));
        }
        Node::Collision {
            entries_start,
            entries_len,
            ..
        } => {
            for i in 0..entries_len {
                let e: &'a Entry<K, V> = store.get_entry(node::offset(entries_start, i));
                out.push((&e.key, &e.value));
            }
        }
        Node::Bitmap { .. } | Node::Array { .. } => {
            for child in store::read_children(store, node) {
                collect(store, child, out);
            }
        }
    }
}
