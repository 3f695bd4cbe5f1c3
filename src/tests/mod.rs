mod basic;
mod collision;

use std::hash::{Hash, Hasher};

use crate::HamtMap;
use crate::node::{self, Node};
use crate::store::{self, HamtStore};

/// A key type with a controllable hash value for testing hash collisions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollidingKey {
    pub id: u32,
    pub forced_hash: u64,
}

impl CollidingKey {
    pub const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Checks every structural invariant of `map`'s trie and that the cached
/// size matches the number of bindings.
pub fn check_map<K, V, S: HamtStore<K, V>>(map: &HamtMap<K, V, S>) {
    let found = check_node(map.store(), map.root(), 0, 0);
    assert_eq!(found, map.len(), "cached size disagrees with the trie");
}

/// Walks the trie checking every structural invariant and returns the
/// number of bindings found.
///
/// `prefix` holds the hash bits consumed on the way down; every tip must
/// agree with it.
pub fn check_node<K, V, S: HamtStore<K, V>>(
    store: &S,
    node: Node<K, V>,
    shift: u32,
    prefix: u32,
) -> usize {
    if let Some(hash) = node.tip_hash() {
        let mask = 1_u32.checked_shl(shift).map_or(u32::MAX, |b| b - 1);
        assert_eq!(hash & mask, prefix, "tip placed under the wrong fragment path");
    }
    match node {
        Node::Empty => 0,
        Node::Leaf { .. } => 1,
        Node::Collision { entries_len, .. } => {
            assert!(entries_len >= 2, "collision node with {entries_len} pairs");
            entries_len
        }
        Node::Bitmap { bitmap, .. } => {
            let children = store::read_children(store, node);
            assert_eq!(node::bit_count32(bitmap) as usize, children.len());
            assert!(!children.is_empty(), "bitmap node without children");
            assert!(
                children.len() <= node::BM_NODE_MAX,
                "bitmap node with {} children",
                children.len()
            );
            assert!(
                children.iter().all(|c| !c.is_empty()),
                "empty node inside a bitmap node"
            );
            if let [only] = children.as_slice() {
                assert!(!only.is_tip(), "bitmap node wrapping a single tip");
            }
            node::bitmap_to_indices(bitmap)
                .zip(children)
                .map(|(frag, c)| {
                    check_node(store, c, shift + node::SHIFT_STEP, prefix | (frag << shift))
                })
                .sum()
        }
        Node::Array { num_children, .. } => {
            let slots = store::read_children(store, node);
            assert_eq!(slots.len(), node::CHUNK);
            let occupied = slots.iter().filter(|c| !c.is_empty()).count();
            assert_eq!(num_children, occupied);
            assert!(
                num_children >= node::ARRAY_NODE_MIN,
                "array node with {num_children} children"
            );
            (0_u32..)
                .zip(slots)
                .map(|(frag, c)| {
                    check_node(store, c, shift + node::SHIFT_STEP, prefix | (frag << shift))
                })
                .sum()
        }
    }
}
