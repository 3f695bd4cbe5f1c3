//! HAMT node types and bit-level helpers.

use std::fmt;

use safe_bump::Idx;

/// Bits of hash consumed per trie level (5 → 32-way branching).
pub const SHIFT_STEP: u32 = 5;

/// Number of child slots per internal node (`2^SHIFT_STEP`).
pub const CHUNK: usize = 32;

/// Mask selecting one hash fragment.
pub const MASK: u32 = 31;

/// Maximum number of children of a bitmap-indexed node.
pub const BM_NODE_MAX: usize = 16;

/// Minimum number of children of an array node.
pub const ARRAY_NODE_MIN: usize = 8;

/// Largest shift at which a 32-bit hash still has bits left (depth 6, 2 bits).
pub const MAX_SHIFT: u32 = 30;

/// Key-value pair stored in the entries arena.
pub struct Entry<K, V> {
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// HAMT node.
///
/// A node holds only indices into the store, so it is `Copy`. Rebuilding a
/// node appends new blocks to the store; blocks of older versions are never
/// touched.
pub enum Node<K, V> {
    /// No bindings below this point.
    Empty,
    /// Single binding.
    Leaf {
        /// Full hash of the key.
        hash: u32,
        /// The stored pair.
        entry: Idx<Entry<K, V>>,
    },
    /// Two or more bindings whose keys share the full hash.
    ///
    /// Invariant: `entries_len >= 2`, keys pairwise distinct.
    Collision {
        /// The shared hash.
        hash: u32,
        /// First pair of the contiguous block.
        entries_start: Idx<Entry<K, V>>,
        /// Number of pairs.
        entries_len: usize,
    },
    /// Sparse internal node.
    ///
    /// Invariant: `popcount(bitmap)` children, none of them `Empty`,
    /// between 1 and [`BM_NODE_MAX`].
    Bitmap {
        /// Occupied fragments.
        bitmap: u32,
        /// First child of the dense block.
        children_start: Idx<Self>,
    },
    /// Dense internal node with [`CHUNK`] slots, holes are `Empty`.
    ///
    /// Invariant: `num_children` equals the number of non-empty slots.
    Array {
        /// Number of non-empty slots.
        num_children: usize,
        /// First slot of the block.
        children_start: Idx<Self>,
    },
}

// ---------------------------------------------------------------------------
// Bit helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit fragment of `hash` at the given shift.
///
/// Shifts of 32 and above have no bits left and yield fragment `0`.
#[inline]
#[must_use]
pub const fn hash_fragment(shift: u32, hash: u32) -> u32 {
    match hash.checked_shr(shift) {
        Some(h) => h & MASK,
        None => 0,
    }
}

/// Returns the single-bit mask for a fragment (0..31).
#[inline]
#[must_use]
pub const fn to_bitmap(fragment: u32) -> u32 {
    1 << fragment
}

/// Returns the dense index of `fragment`'s slot within a bitmap node.
#[inline]
#[must_use]
pub const fn from_bitmap(bitmap: u32, fragment: u32) -> usize {
    bit_count32(bitmap & (to_bitmap(fragment) - 1)) as usize
}

/// Population count of a 32-bit word.
#[inline]
#[must_use]
pub const fn bit_count32(n: u32) -> u32 {
    n.count_ones()
}

/// Ascending positions of the set bits of `bitmap`.
///
/// The iterator is `Clone`, so the sequence can be restarted.
#[must_use]
pub const fn bitmap_to_indices(bitmap: u32) -> BitIndices {
    BitIndices { rest: bitmap }
}

/// Inverse of [`bitmap_to_indices`].
pub fn indices_to_bitmap(indices: impl IntoIterator<Item = u32>) -> u32 {
    indices.into_iter().fold(0, |bm, i| bm | to_bitmap(i))
}

/// Iterator over set-bit positions, lowest first.
#[derive(Debug, Clone)]
pub struct BitIndices {
    rest: u32,
}

impl Iterator for BitIndices {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.rest == 0 {
            return None;
        }
        let i = self.rest.trailing_zeros();
        self.rest &= self.rest - 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = bit_count32(self.rest) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitIndices {}

/// Offsets a base index by `n` positions.
#[inline]
#[must_use]
pub const fn offset<T>(base: Idx<T>, n: usize) -> Idx<T> {
    Idx::from_raw(base.into_raw() + n)
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    /// `true` for [`Empty`](Self::Empty).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// `true` for nodes with no trie structure below them.
    ///
    /// Tips do not depend on their depth, so they may be moved up or down
    /// the trie freely.
    #[must_use]
    pub const fn is_tip(&self) -> bool {
        matches!(self, Self::Empty | Self::Leaf { .. } | Self::Collision { .. })
    }

    /// Full hash carried by a `Leaf` or `Collision` tip.
    #[must_use]
    pub const fn tip_hash(&self) -> Option<u32> {
        match self {
            Self::Leaf { hash, .. } | Self::Collision { hash, .. } => Some(*hash),
            _ => None,
        }
    }

    /// Number of child slots stored in this node's block.
    #[must_use]
    pub const fn block_len(&self) -> usize {
        match self {
            Self::Bitmap { bitmap, .. } => bit_count32(*bitmap) as usize,
            Self::Array { .. } => CHUNK,
            _ => 0,
        }
    }
}

// Node contains only indices and primitives, so these impls carry no
// `K`/`V` bounds.

impl<K, V> Clone for Node<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Node<K, V> {}

impl<K, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Leaf { hash, .. } => f
                .debug_struct("Leaf")
                .field("hash", &format_args!("{hash:#010x}"))
                .finish_non_exhaustive(),
            Self::Collision {
                hash, entries_len, ..
            } => f
                .debug_struct("Collision")
                .field("hash", &format_args!("{hash:#010x}"))
                .field("entries_len", entries_len)
                .finish_non_exhaustive(),
            Self::Bitmap { bitmap, .. } => f
                .debug_struct("Bitmap")
                .field("bitmap", &format_args!("{bitmap:#034b}"))
                .finish_non_exhaustive(),
            Self::Array { num_children, .. } => f
                .debug_struct("Array")
                .field("num_children", num_children)
                .finish_non_exhaustive(),
        }
    }
}
