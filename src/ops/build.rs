//! Node constructors shared by alteration and the structural transforms.

use safe_bump::Idx;

use crate::node::{self, Entry, Node};
use crate::store::HamtStore;

/// Clones the pair at `idx` out of the store.
pub fn clone_entry<K: Clone, V: Clone, S: HamtStore<K, V>>(
    store: &S,
    idx: Idx<Entry<K, V>>,
) -> Entry<K, V> {
    let e = store.get_entry(idx);
    Entry {
        key: e.key.clone(),
        value: e.value.clone(),
    }
}

/// Clones every pair held by a `Leaf` or `Collision` tip.
pub fn tip_entries<K: Clone, V: Clone, S: HamtStore<K, V>>(
    store: &S,
    tip: Node<K, V>,
) -> Vec<Entry<K, V>> {
    match tip {
        Node::Leaf { entry, .. } => vec![clone_entry(store, entry)],
        Node::Collision {
            entries_start,
            entries_len,
            ..
        } => (0..entries_len)
            .map(|i| clone_entry(store, node::offset(entries_start, i)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Builds the tip for pairs sharing `hash`: a `Leaf` for one pair, a
/// `Collision` for more.
///
/// # Panics
///
/// Panics on an empty list. Collision nodes never shrink to nothing;
/// callers that may filter everything out check for it first.
pub fn tip_from_entries<K, V, S: HamtStore<K, V>>(
    store: &mut S,
    hash: u32,
    mut entries: Vec<Entry<K, V>>,
) -> Node<K, V> {
    if entries.len() == 1
        && let Some(only) = entries.pop()
    {
        let entry = store.alloc_entry(only);
        return Node::Leaf { hash, entry };
    }
    let entries_len = entries.len();
    let Some(entries_start) = store.alloc_entries(entries) else {
        panic!("hash-collision node reduced to zero pairs");
    };
    Node::Collision {
        hash,
        entries_start,
        entries_len,
    }
}

/// Allocates a bitmap-indexed node over a non-empty dense child list.
pub fn bitmap_node<K, V, S: HamtStore<K, V>>(
    store: &mut S,
    bitmap: u32,
    children: impl IntoIterator<Item = Node<K, V>>,
) -> Node<K, V> {
    let children_start = store
        .alloc_children(children)
        .expect("bitmap node has at least one child");
    Node::Bitmap {
        bitmap,
        children_start,
    }
}

/// Allocates an array node over a full block of [`CHUNK`](node::CHUNK) slots.
pub fn array_node<K, V, S: HamtStore<K, V>>(
    store: &mut S,
    num_children: usize,
    slots: impl IntoIterator<Item = Node<K, V>>,
) -> Node<K, V> {
    let children_start = store
        .alloc_children(slots)
        .expect("array node block is never empty");
    Node::Array {
        num_children,
        children_start,
    }
}

/// Bitmap node for `children`, or the sole child itself when it is a tip.
///
/// No children at all yields `Empty`.
pub fn collapse_or_bitmap<K, V, S: HamtStore<K, V>>(
    store: &mut S,
    bitmap: u32,
    children: Vec<Node<K, V>>,
) -> Node<K, V> {
    match children.as_slice() {
        [] => Node::Empty,
        [only] if only.is_tip() => *only,
        _ => bitmap_node(store, bitmap, children),
    }
}

/// Spreads a bitmap node's dense children over a full array block.
pub fn expand_bitmap<K, V, S: HamtStore<K, V>>(
    store: &mut S,
    bitmap: u32,
    children: &[Node<K, V>],
) -> Node<K, V> {
    let mut slots = [Node::Empty; node::CHUNK];
    for (frag, child) in node::bitmap_to_indices(bitmap).zip(children) {
        slots[frag as usize] = *child;
    }
    array_node(store, children.len(), slots)
}

/// Packs the non-empty slots of an array block into a bitmap node,
/// collapsing to a tip or `Empty` as needed.
pub fn pack_slots<K, V, S: HamtStore<K, V>>(store: &mut S, slots: &[Node<K, V>]) -> Node<K, V> {
    let occupied = (0_u32..).zip(slots).filter(|(_, n)| !n.is_empty());
    let bitmap = node::indices_to_bitmap(occupied.clone().map(|(i, _)| i));
    let children = occupied.map(|(_, n)| *n).collect();
    collapse_or_bitmap(store, bitmap, children)
}
