//! Hash strategies for byte-string keys.
//!
//! A [`Table`](crate::Table) is parameterized by a [`BuildHasher`]. Each key
//! is hashed by building one hasher, writing the key bytes once and calling
//! `finish`, so any `BuildHasher` whose hasher treats a single `write` as
//! "hash these bytes" gives the `hash(bytes, length) -> u64` contract the
//! table relies on.

use core::hash::BuildHasher;
use core::hash::Hasher;

/// Hashes `key` with a fresh hasher from `hash_builder`.
///
/// Unlike [`BuildHasher::hash_one`], no length prefix or terminator is
/// written: the hash covers exactly the key bytes.
#[inline]
pub fn hash_key<S: BuildHasher>(hash_builder: &S, key: &[u8]) -> u64 {
    let mut hasher = hash_builder.build_hasher();
    hasher.write(key);
    hasher.finish()
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`Table::new`](crate::Table::new) when no
        /// other is named: foldhash's fast, per-table seeded `RandomState`.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`Table::new`](crate::Table::new) when no
        /// other is named: the standard library's SipHash-1-3 `RandomState`.
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// A [`BuildHasher`] producing 64-bit XXH3 hashes.
///
/// A key written in one call hashes to `xxh3_64_with_seed(key, seed)`, so
/// tables using this strategy agree with any other XXH3 implementation.
///
/// # Examples
///
/// ```rust
/// use lintab::Table;
/// use lintab::hasher::Xxh3BuildHasher;
///
/// let mut table = Table::with_hasher(Xxh3BuildHasher::default());
/// table.insert("alpha", 1);
/// assert_eq!(table.get("alpha"), 1);
/// ```
#[cfg(feature = "xxh3")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xxh3BuildHasher {
    seed: u64,
}

#[cfg(feature = "xxh3")]
impl Xxh3BuildHasher {
    /// Creates a builder whose hashers are seeded with `seed`.
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

#[cfg(feature = "xxh3")]
impl BuildHasher for Xxh3BuildHasher {
    type Hasher = Xxh3Hasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        Xxh3Hasher { state: self.seed }
    }
}

/// The [`Hasher`] built by [`Xxh3BuildHasher`].
///
/// Each `write` rehashes the bytes seeded by the running state.
#[cfg(feature = "xxh3")]
#[derive(Debug, Clone)]
pub struct Xxh3Hasher {
    state: u64,
}

#[cfg(feature = "xxh3")]
impl Hasher for Xxh3Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = xxhash_rust::xxh3::xxh3_64_with_seed(bytes, self.state);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}
