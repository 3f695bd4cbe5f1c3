//! Lookup: descends the trie guided by hash fragments.

use crate::node::{self, Node};
use crate::store::HamtStore;

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns a reference to the value if found. Absence is not an error.
pub fn lookup_node<'a, K, V, S>(
    store: &'a S,
    node: Node<K, V>,
    shift: u32,
    hash: u32,
    key: &K,
) -> Option<&'a V>
where
    K: Eq + 'a,
    V: 'a,
    S: HamtStore<K, V>,
{
    match node {
        Node::Empty => None,
        Node::Leaf { hash: leaf_hash, entry } => {
            let entry = store.get_entry(entry);
            (leaf_hash == hash && entry.key == *key).then_some(&entry.value)
        }
        Node::Collision {
            hash: node_hash,
            entries_start,
            entries_len,
        } => {
            if hash != node_hash {
                return None;
            }
            // Linear search through colliding pairs.
            (0..entries_len)
                .map(|i| store.get_entry(node::offset(entries_start, i)))
                .find(|e| e.key == *key)
                .map(|e| &e.value)
        }
        Node::Bitmap {
            bitmap,
            children_start,
        } => {
            let frag = node::hash_fragment(shift, hash);
            if bitmap & node::to_bitmap(frag) == 0 {
                return None;
            }
            let idx = node::from_bitmap(bitmap, frag);
            let child = *store.get_child(node::offset(children_start, idx));
            lookup_node(store, child, shift + node::SHIFT_STEP, hash, key)
        }
        Node::Array { children_start, .. } => {
            let frag = node::hash_fragment(shift, hash) as usize;
            // Holes are `Empty` and resolve to `None` on recursion.
            let child = *store.get_child(node::offset(children_start, frag));
            lookup_node(store, child, shift + node::SHIFT_STEP, hash, key)
        }
    }
}
