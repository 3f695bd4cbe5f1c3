//! Key hashing for trie placement.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Computes the 32-bit trie hash of a value.
///
/// The 64-bit `DefaultHasher` output is folded so that both halves
/// contribute to the fragments.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u32 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}
