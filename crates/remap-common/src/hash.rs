//! Stable content hashing for plan memoization.
//!
//! A mapping plan is a pure function of its directive plus the descriptors
//! it touches, so re-running a pass with unchanged inputs can reuse the
//! cached plan. Keys are 64-bit hashes produced by `FxHasher`, which is
//! deterministic for a given input (no random per-process seed).

use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Hash any `Hash` value into a stable 64-bit key.
pub fn content_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Incrementally combine several values into one key.
pub struct ContentHasher {
    inner: FxHasher,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self {
            inner: FxHasher::default(),
        }
    }

    pub fn write<T: Hash + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.hash(&mut self.inner);
        self
    }

    pub fn finish(&self) -> u64 {
        self.inner.finish()
    }
}
