//! Persistent hash map based on a hash array mapped trie.
//!
//! A HAMT indexes a trie by successive 5-bit fragments of a key's 32-bit
//! hash. Internal nodes switch representation with their population:
//!
//! - **Bitmap-indexed** nodes keep only existing children, located through
//!   a 32-bit presence bitmap and a popcount.
//! - **Array** nodes keep all 32 slots once a bitmap node would exceed
//!   16 children, and pack back into a bitmap node below 8.
//! - **Collision** nodes hold keys whose full hashes are equal.
//!
//! # Key properties
//!
//! - **Path copying**: an update rebuilds only the nodes from the root to
//!   the altered entry; everything else is shared with the previous version
//! - **Arena ownership**: nodes are `Copy` handles into append-only arenas,
//!   so older versions stay readable ([`HamtMap::version`])
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Bagwell, 2001, "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

use std::fmt;

pub mod error;
pub mod hash;
pub mod iter;
pub mod node;
pub mod store;

mod arena;
mod arena_sync;
mod map;
mod ops;
mod view;

#[cfg(test)]
mod tests;

pub use arena::HamtArena;
pub use arena_sync::HamtArenaSync;
pub use error::HamtError;
pub use map::{HamtMap, HamtMapSync};
pub use ops::alter::Change;
pub use view::HamtView;

/// Saved map version.
///
/// Created by [`HamtMap::checkpoint`]. It can be read back through
/// [`HamtMap::version`] or restored with [`HamtMap::rollback`], which
/// discards all changes made after it.
///
/// A checkpoint stays live until a rollback truncates the arenas below the
/// lengths it recorded. Stale checkpoints are rejected with
/// [`HamtError::StaleCheckpoint`]. Checkpoints belong to the map that
/// created them.
pub struct HamtCheckpoint<K, V> {
    /// Two-arena store checkpoint.
    pub store: store::StoreCheckpoint<K, V>,
    /// Root node at checkpoint time.
    pub root: node::Node<K, V>,
    /// Entry count at checkpoint time.
    pub size: usize,
    /// Number of rollbacks the map had performed at checkpoint time.
    pub epoch: usize,
    /// `(entries, children)` arena lengths at checkpoint time.
    pub arena_len: (usize, usize),
}

// HamtCheckpoint contains only indices and primitives, no actual K/V data.

impl<K, V> Clone for HamtCheckpoint<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for HamtCheckpoint<K, V> {}

impl<K, V> fmt::Debug for HamtCheckpoint<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtCheckpoint")
            .field("size", &self.size)
            .field("epoch", &self.epoch)
            .field("arena_len", &self.arena_len)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
