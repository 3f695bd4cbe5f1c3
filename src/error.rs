//! Errors surfaced to map callers.

use std::error::Error;
use std::fmt;

/// Recoverable failure of a strict map operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HamtError {
    /// Strict lookup of a key that is not bound.
    KeyNotFound,
    /// Checkpoint whose arena space was discarded by a later rollback.
    StaleCheckpoint,
}

impl fmt::Display for HamtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => write!(f, "key not found"),
            Self::StaleCheckpoint => write!(f, "checkpoint invalidated by rollback"),
        }
    }
}

impl Error for HamtError {}
