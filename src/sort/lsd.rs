//! LSD radix sort over physical keys
//!
//! A stable counting sort applied per byte position, least significant
//! first. Stability across passes is what makes the final order correct, so
//! the scatter step must never reorder keys that share a byte value.

use crate::error::{Result, SortError};
use crate::sort::SortStats;
use crate::store::ByteKey;
use std::time::Instant;

const RADIX: usize = 256;

/// Single-threaded, stable LSD radix sort for uniform-length byte keys.
///
/// Runs in O(L * (n + 256)) time with O(n) extra space for L-byte keys.
/// Fully deterministic; equal keys keep their relative order.
#[derive(Debug, Default)]
pub struct LsdRadixSort {
    stats: SortStats,
}

impl LsdRadixSort {
    /// Create a new sorter
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort keys in ascending lexicographic order.
    ///
    /// The full input is validated for uniform key length before any
    /// sorting work begins; on a mismatch the input is returned untouched.
    /// Empty input is a no-op.
    pub fn sort(&mut self, keys: &mut Vec<ByteKey>) -> Result<()> {
        let start_time = Instant::now();

        if keys.is_empty() {
            return Ok(());
        }

        let key_len = keys[0].len();
        for (index, key) in keys.iter().enumerate() {
            if key.len() != key_len {
                return Err(SortError::key_length_mismatch(key_len, key.len(), index));
            }
        }

        let mut scratch: Vec<ByteKey> = vec![ByteKey::new(); keys.len()];

        for byte_index in (0..key_len).rev() {
            // Count byte values at this position over the current order
            let mut counts = [0usize; RADIX];
            for key in keys.iter() {
                counts[key[byte_index] as usize] += 1;
            }

            // Exclusive prefix sums give each value its starting offset
            let mut offsets = [0usize; RADIX];
            let mut sum = 0;
            for value in 0..RADIX {
                offsets[value] = sum;
                sum += counts[value];
            }

            // Stable scatter into the scratch array, then adopt it
            for slot in 0..keys.len() {
                let key = std::mem::take(&mut keys[slot]);
                let value = key[byte_index] as usize;
                scratch[offsets[value]] = key;
                offsets[value] += 1;
            }
            std::mem::swap(keys, &mut scratch);
        }

        let elapsed = start_time.elapsed();
        self.stats = SortStats {
            items_processed: keys.len(),
            processing_time_us: elapsed.as_micros() as u64,
            used_parallel: false,
            tasks_spawned: 0,
        };
        log::debug!(
            "lsd sort: {} keys x {} bytes in {}us",
            keys.len(),
            key_len,
            self.stats.processing_time_us
        );

        Ok(())
    }

    /// Statistics from the last execution
    pub fn stats(&self) -> &SortStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::generate_keys;

    fn is_sorted(keys: &[ByteKey]) -> bool {
        keys.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_concrete_scenario() {
        let mut keys = vec![b"banana".to_vec(), b"apple!".to_vec(), b"cherry".to_vec()];
        LsdRadixSort::new().sort(&mut keys).unwrap();
        assert_eq!(
            keys,
            vec![b"apple!".to_vec(), b"banana".to_vec(), b"cherry".to_vec()]
        );
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut keys: Vec<ByteKey> = Vec::new();
        let mut sorter = LsdRadixSort::new();
        sorter.sort(&mut keys).unwrap();
        assert!(keys.is_empty());
        assert_eq!(sorter.stats().items_processed, 0);
    }

    #[test]
    fn test_single_key() {
        let mut keys = vec![b"only".to_vec()];
        LsdRadixSort::new().sort(&mut keys).unwrap();
        assert_eq!(keys, vec![b"only".to_vec()]);
    }

    #[test]
    fn test_length_mismatch_leaves_input_untouched() {
        let original = vec![b"abcd".to_vec(), b"xy".to_vec(), b"efgh".to_vec()];
        let mut keys = original.clone();
        let err = LsdRadixSort::new().sort(&mut keys).unwrap_err();
        assert_eq!(err.category(), "key_length");
        assert_eq!(keys, original);
    }

    #[test]
    fn test_matches_comparison_sort() {
        let mut keys = generate_keys(500, 8, 7);
        let mut expected = keys.clone();
        expected.sort_unstable();

        LsdRadixSort::new().sort(&mut keys).unwrap();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_idempotent() {
        let mut keys = generate_keys(200, 6, 11);
        let mut sorter = LsdRadixSort::new();
        sorter.sort(&mut keys).unwrap();
        let once = keys.clone();
        sorter.sort(&mut keys).unwrap();
        assert_eq!(keys, once);
    }

    #[test]
    fn test_duplicates_and_full_range_bytes() {
        let mut keys = vec![
            vec![0xff, 0x00],
            vec![0x00, 0xff],
            vec![0xff, 0x00],
            vec![0x00, 0x00],
            vec![0x80, 0x7f],
        ];
        LsdRadixSort::new().sort(&mut keys).unwrap();
        assert!(is_sorted(&keys));
        assert_eq!(keys[0], vec![0x00, 0x00]);
        assert_eq!(keys[4], vec![0xff, 0x00]);
    }

    #[test]
    fn test_stats_recorded() {
        let mut keys = generate_keys(100, 4, 3);
        let mut sorter = LsdRadixSort::new();
        sorter.sort(&mut keys).unwrap();
        let stats = sorter.stats();
        assert_eq!(stats.items_processed, 100);
        assert!(!stats.used_parallel);
        assert_eq!(stats.tasks_spawned, 0);
    }
}
