//! Immutable key storage addressed by flattened row index
//!
//! A [`KeyStore`] owns the fixed-length byte keys for one sort operation.
//! It is populated once, validated at construction, and read-only for its
//! entire lifetime, so any number of worker threads may read it
//! concurrently without synchronization.

use crate::error::{Result, SortError};

/// A fixed-length binary sort key. All keys in one sort operation share the
/// same length; ordering is lexicographic over unsigned bytes, identical to
/// raw memory comparison.
pub type ByteKey = Vec<u8>;

/// Immutable, uniformly-sized key array backing the row-identifier sorts.
#[derive(Debug)]
pub struct KeyStore {
    keys: Vec<ByteKey>,
    key_len: usize,
}

impl KeyStore {
    /// Build a store from pre-populated keys, validating that every key has
    /// the length of the first. Validation happens before the store exists,
    /// so a mismatch leaves the caller holding an error and no store.
    pub fn new(keys: Vec<ByteKey>) -> Result<Self> {
        let key_len = keys.first().map(|k| k.len()).unwrap_or(0);
        for (index, key) in keys.iter().enumerate() {
            if key.len() != key_len {
                return Err(SortError::key_length_mismatch(key_len, key.len(), index));
            }
        }
        Ok(Self { keys, key_len })
    }

    /// Number of keys in the store
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the store holds no keys
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Uniform key length in bytes (0 for an empty store)
    #[inline]
    pub fn key_len(&self) -> usize {
        self.key_len
    }

    /// Bounds-checked key access by flattened row index
    pub fn key(&self, index: usize) -> Result<&[u8]> {
        crate::error::check_bounds(index, self.keys.len())?;
        Ok(&self.keys[index])
    }

    /// Unchecked key access for sort hot paths. The in-bounds invariant is
    /// the caller's responsibility; debug builds still assert it.
    #[inline(always)]
    pub fn key_unchecked(&self, index: usize) -> &[u8] {
        debug_assert!(index < self.keys.len(), "row index {} out of bounds", index);
        &self.keys[index]
    }

    /// Consume the store and return the backing keys
    pub fn into_keys(self) -> Vec<ByteKey> {
        self.keys
    }

    /// Iterate over the stored keys in index order
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(|k| k.as_slice())
    }
}
