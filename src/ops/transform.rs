//! Whole-trie transforms: value mapping, filtering and counting.
//!
//! Both transforms read from one store and write into another, so the
//! source version stays intact.

use crate::node::{self, Entry, Node};
use crate::ops::build;
use crate::store::{self, HamtStore};

/// Rebuilds the subtree with every value replaced by `f(key, value)`.
///
/// The output has exactly the same shape as the input.
pub fn map_node<K, V, W, S, T, F>(src: &S, dst: &mut T, node: Node<K, V>, f: &mut F) -> Node<K, W>
where
    K: Clone,
    S: HamtStore<K, V>,
    T: HamtStore<K, W>,
    F: FnMut(&K, &V) -> W,
{
    match node {
        Node::Empty => Node::Empty,
        Node::Leaf { hash, entry } => {
            let e = src.get_entry(entry);
            let value = f(&e.key, &e.value);
            let entry = dst.alloc_entry(Entry {
                key: e.key.clone(),
                value,
            });
            Node::Leaf { hash, entry }
        }
        Node::Collision {
            hash,
            entries_start,
            entries_len,
        } => {
            let entries: Vec<Entry<K, W>> = (0..entries_len)
                .map(|i| {
                    let e = src.get_entry(node::offset(entries_start, i));
                    Entry {
                        key: e.key.clone(),
                        value: f(&e.key, &e.value),
                    }
                })
                .collect();
            build::tip_from_entries(dst, hash, entries)
        }
        Node::Bitmap { bitmap, .. } => {
            let children: Vec<Node<K, W>> = store::read_children(src, node)
                .into_iter()
                .map(|child| map_node(src, dst, child, f))
                .collect();
            build::bitmap_node(dst, bitmap, children)
        }
        Node::Array { num_children, .. } => {
            let slots: Vec<Node<K, W>> = store::read_children(src, node)
                .into_iter()
                .map(|child| map_node(src, dst, child, f))
                .collect();
            build::array_node(dst, num_children, slots)
        }
    }
}

/// Rebuilds the subtree keeping only the pairs accepted by `pred`.
///
/// Internal nodes drop emptied children, a lone tip child replaces its
/// parent, and an array node whose survivors fit in
/// [`BM_NODE_MAX`](node::BM_NODE_MAX) becomes a bitmap node.
pub fn filter_node<K, V, S, T, P>(src: &S, dst: &mut T, node: Node<K, V>, pred: &mut P) -> Node<K, V>
where
    K: Clone,
    V: Clone,
    S: HamtStore<K, V>,
    T: HamtStore<K, V>,
    P: FnMut(&K, &V) -> bool,
{
    match node {
        Node::Empty => Node::Empty,
        Node::Leaf { .. } | Node::Collision { .. } => {
            let Some(hash) = node.tip_hash() else {
                return Node::Empty;
            };
            let kept: Vec<Entry<K, V>> = build::tip_entries(src, node)
                .into_iter()
                .filter(|e| pred(&e.key, &e.value))
                .collect();
            if kept.is_empty() {
                Node::Empty
            } else {
                build::tip_from_entries(dst, hash, kept)
            }
        }
        Node::Bitmap { bitmap, .. } => {
            let mut new_bitmap = 0;
            let mut children = Vec::new();
            for (frag, child) in node::bitmap_to_indices(bitmap).zip(store::read_children(src, node)) {
                let child = filter_node(src, dst, child, pred);
                if !child.is_empty() {
                    new_bitmap |= node::to_bitmap(frag);
                    children.push(child);
                }
            }
            build::collapse_or_bitmap(dst, new_bitmap, children)
        }
        Node::Array { .. } => {
            let slots: Vec<Node<K, V>> = store::read_children(src, node)
                .into_iter()
                .map(|child| filter_node(src, dst, child, pred))
                .collect();
            let num_children = slots.iter().filter(|n| !n.is_empty()).count();
            if num_children <= node::BM_NODE_MAX {
                build::pack_slots(dst, &slots)
            } else {
                build::array_node(dst, num_children, slots)
            }
        }
    }
}

/// Counts the bindings below `node` by walking the whole subtree.
pub fn number_of_elements<K, V, S: HamtStore<K, V>>(store: &S, node: Node<K, V>) -> usize {
    match node {
        Node::Empty => 0,
        Node::Leaf { .. } => 1,
        Node::Collision { entries_len, .. } => entries_len,
        Node::Bitmap { .. } | Node::Array { .. } => store::read_children(store, node)
            .into_iter()
            .map(|child| number_of_elements(store, child))
            .sum(),
    }
}
