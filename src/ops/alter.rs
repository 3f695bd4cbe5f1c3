//! Alteration: path-copy rebuild behind insert, delete and update.

use safe_bump::Idx;

use crate::node::{self, Entry, Node};
use crate::ops::build;
use crate::store::{self, HamtStore};

/// Effect of an alteration on a single binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A new key was bound.
    Added,
    /// An existing key was unbound.
    Removed,
    /// An existing key was bound to a new value.
    Modified,
    /// Nothing changed; the original node was kept.
    Unchanged,
}

/// Outcome of a recursive alteration.
pub struct AlterOutcome<K, V> {
    /// Root of the rebuilt subtree, or the original node when unchanged.
    pub node: Node<K, V>,
    /// What happened to the binding.
    pub change: Change,
}

impl<K, V> AlterOutcome<K, V> {
    const fn new(node: Node<K, V>, change: Change) -> Self {
        Self { node, change }
    }

    const fn unchanged(node: Node<K, V>) -> Self {
        Self {
            node,
            change: Change::Unchanged,
        }
    }
}

/// Applies `f` to the current value of `key` in the subtree rooted at
/// `node` and rebuilds the path to reflect the result.
///
/// `f` receives `None` when the key is absent; returning `None` removes the
/// binding (or leaves it absent). Nodes off the path are shared, and the
/// original node is returned as-is when nothing changes.
pub fn alter_node<K, V, S, F>(
    store: &mut S,
    node: Node<K, V>,
    shift: u32,
    hash: u32,
    key: K,
    f: F,
) -> AlterOutcome<K, V>
where
    K: Eq + Clone,
    V: Clone,
    S: HamtStore<K, V>,
    F: FnOnce(Option<&V>) -> Option<V>,
{
    match node {
        Node::Empty => alter_empty(store, hash, key, f),
        Node::Leaf {
            hash: leaf_hash,
            entry,
        } => {
            if leaf_hash == hash && store.get_entry(entry).key == key {
                let result = f(Some(&store.get_entry(entry).value));
                let Some(value) = result else {
                    return AlterOutcome::new(Node::Empty, Change::Removed);
                };
                let entry = store.alloc_entry(Entry { key, value });
                AlterOutcome::new(Node::Leaf { hash, entry }, Change::Modified)
            } else {
                alter_beside(store, node, shift, hash, key, f)
            }
        }
        Node::Collision {
            hash: node_hash,
            entries_start,
            entries_len,
        } => {
            if node_hash == hash {
                alter_collision(store, node, entries_start, entries_len, hash, key, f)
            } else {
                alter_beside(store, node, shift, hash, key, f)
            }
        }
        Node::Bitmap { bitmap, .. } => alter_bitmap(store, node, bitmap, shift, hash, key, f),
        Node::Array { num_children, .. } => {
            alter_array(store, node, num_children, shift, hash, key, f)
        }
    }
}

fn alter_empty<K, V, S, F>(store: &mut S, hash: u32, key: K, f: F) -> AlterOutcome<K, V>
where
    S: HamtStore<K, V>,
    F: FnOnce(Option<&V>) -> Option<V>,
{
    match f(None) {
        Some(value) => {
            let entry = store.alloc_entry(Entry { key, value });
            AlterOutcome::new(Node::Leaf { hash, entry }, Change::Added)
        }
        None => AlterOutcome::unchanged(Node::Empty),
    }
}

/// Alters a key that is absent from the tip `existing`.
///
/// The key is first bound on its own, then both tips are combined.
fn alter_beside<K, V, S, F>(
    store: &mut S,
    existing: Node<K, V>,
    shift: u32,
    hash: u32,
    key: K,
    f: F,
) -> AlterOutcome<K, V>
where
    K: Clone,
    V: Clone,
    S: HamtStore<K, V>,
    F: FnOnce(Option<&V>) -> Option<V>,
{
    let fresh = alter_empty(store, hash, key, f);
    if fresh.change == Change::Unchanged {
        return AlterOutcome::unchanged(existing);
    }
    let node = combine_nodes(store, shift, existing, fresh.node);
    AlterOutcome::new(node, Change::Added)
}

/// Joins two tips with distinct keys into the smallest subtree holding both.
///
/// Equal hashes make a collision node with `added`'s pairs first. Otherwise
/// bitmap nodes are nested until the fragments at `shift` diverge, which
/// happens by [`MAX_SHIFT`](node::MAX_SHIFT) at the latest.
///
/// # Panics
///
/// Panics if either node is not a `Leaf` or `Collision`.
pub fn combine_nodes<K, V, S>(
    store: &mut S,
    shift: u32,
    existing: Node<K, V>,
    added: Node<K, V>,
) -> Node<K, V>
where
    K: Clone,
    V: Clone,
    S: HamtStore<K, V>,
{
    let (Some(h1), Some(h2)) = (existing.tip_hash(), added.tip_hash()) else {
        panic!("combine_nodes requires leaf or collision tips, got {existing:?} and {added:?}");
    };

    if h1 == h2 {
        let mut entries = build::tip_entries(store, added);
        entries.extend(build::tip_entries(store, existing));
        return build::tip_from_entries(store, h1, entries);
    }

    let f1 = node::hash_fragment(shift, h1);
    let f2 = node::hash_fragment(shift, h2);
    if f1 == f2 {
        let child = combine_nodes(store, shift + node::SHIFT_STEP, existing, added);
        build::bitmap_node(store, node::to_bitmap(f1), [child])
    } else {
        let children = if f1 < f2 {
            [existing, added]
        } else {
            [added, existing]
        };
        build::bitmap_node(store, node::to_bitmap(f1) | node::to_bitmap(f2), children)
    }
}

// ---------------------------------------------------------------------------
// Collision node
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn alter_collision<K, V, S, F>(
    store: &mut S,
    collision: Node<K, V>,
    entries_start: Idx<Entry<K, V>>,
    entries_len: usize,
    hash: u32,
    key: K,
    f: F,
) -> AlterOutcome<K, V>
where
    K: Eq + Clone,
    V: Clone,
    S: HamtStore<K, V>,
    F: FnOnce(Option<&V>) -> Option<V>,
{
    let pos = (0..entries_len)
        .find(|&i| store.get_entry(node::offset(entries_start, i)).key == key);

    let Some(pos) = pos else {
        let Some(value) = f(None) else {
            return AlterOutcome::unchanged(collision);
        };
        // New pair goes in front.
        let mut entries = vec![Entry { key, value }];
        entries.extend(build::tip_entries(store, collision));
        let node = build::tip_from_entries(store, hash, entries);
        return AlterOutcome::new(node, Change::Added);
    };

    let result = f(Some(&store.get_entry(node::offset(entries_start, pos)).value));
    let mut entries = build::tip_entries(store, collision);
    let change = match result {
        Some(value) => {
            entries[pos] = Entry { key, value };
            Change::Modified
        }
        None => {
            entries.remove(pos);
            Change::Removed
        }
    };
    // One pair left demotes to a leaf.
    AlterOutcome::new(build::tip_from_entries(store, hash, entries), change)
}

// ---------------------------------------------------------------------------
// Bitmap-indexed node
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn alter_bitmap<K, V, S, F>(
    store: &mut S,
    parent: Node<K, V>,
    bitmap: u32,
    shift: u32,
    hash: u32,
    key: K,
    f: F,
) -> AlterOutcome<K, V>
where
    K: Eq + Clone,
    V: Clone,
    S: HamtStore<K, V>,
    F: FnOnce(Option<&V>) -> Option<V>,
{
    let frag = node::hash_fragment(shift, hash);
    let bit = node::to_bitmap(frag);
    let idx = node::from_bitmap(bitmap, frag);
    let present = bitmap & bit != 0;

    let mut children = store::read_children(store, parent);
    let child = if present { children[idx] } else { Node::Empty };
    let outcome = alter_node(store, child, shift + node::SHIFT_STEP, hash, key, f);

    let node = match outcome.change {
        Change::Unchanged => return AlterOutcome::unchanged(parent),
        Change::Added if !present => {
            children.insert(idx, outcome.node);
            if children.len() > node::BM_NODE_MAX {
                build::expand_bitmap(store, bitmap | bit, &children)
            } else {
                build::bitmap_node(store, bitmap | bit, children)
            }
        }
        Change::Removed if outcome.node.is_empty() => {
            children.remove(idx);
            build::collapse_or_bitmap(store, bitmap & !bit, children)
        }
        _ => {
            children[idx] = outcome.node;
            build::collapse_or_bitmap(store, bitmap, children)
        }
    };
    AlterOutcome::new(node, outcome.change)
}

// ---------------------------------------------------------------------------
// Array node
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn alter_array<K, V, S, F>(
    store: &mut S,
    parent: Node<K, V>,
    num_children: usize,
    shift: u32,
    hash: u32,
    key: K,
    f: F,
) -> AlterOutcome<K, V>
where
    K: Eq + Clone,
    V: Clone,
    S: HamtStore<K, V>,
    F: FnOnce(Option<&V>) -> Option<V>,
{
    let frag = node::hash_fragment(shift, hash) as usize;
    let mut slots = store::read_children(store, parent);
    let child = slots[frag];
    let outcome = alter_node(store, child, shift + node::SHIFT_STEP, hash, key, f);

    let num_children = match outcome.change {
        Change::Unchanged => return AlterOutcome::unchanged(parent),
        Change::Added if child.is_empty() => num_children + 1,
        Change::Removed if outcome.node.is_empty() => num_children - 1,
        _ => num_children,
    };
    slots[frag] = outcome.node;

    let node = if num_children < node::ARRAY_NODE_MIN {
        build::pack_slots(store, &slots)
    } else {
        build::array_node(store, num_children, slots)
    };
    AlterOutcome::new(node, outcome.change)
}
