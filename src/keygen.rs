//! Deterministic data generation for tests and benchmarks
//!
//! These collaborators feed the sort paths but are not part of them: key
//! generation fills a store, row-id generation covers it, and the key
//! formatter renders keys for logs and demos.

use crate::store::ByteKey;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use crate::rowid::generate_row_ids;

/// Generate `num_keys` pseudo-random keys of `key_len` lowercase-letter
/// bytes. The same seed always produces the same keys.
pub fn generate_keys(num_keys: usize, key_len: usize, seed: u64) -> Vec<ByteKey> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys = Vec::with_capacity(num_keys);
    for _ in 0..num_keys {
        let key: ByteKey = (0..key_len).map(|_| rng.gen_range(b'a'..=b'z')).collect();
        keys.push(key);
    }
    keys
}

/// Render a key as printable text, replacing non-ASCII-printable bytes
pub fn format_key(key: &[u8]) -> String {
    key.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
