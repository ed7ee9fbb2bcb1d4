//! Sorting engines for fixed-length binary keys
//!
//! Three paths share one data model. The hybrid path buckets row
//! identifiers by the most significant key byte and sorts each bucket in
//! parallel; the LSD path sorts physical keys with a stable byte-wise
//! counting sort; the merge path splits row identifiers into contiguous
//! chunks, sorts them in parallel and merges pairwise. All row-identifier
//! comparisons go through the explicit [`KeyComparator`] capability.

pub mod hybrid;
pub mod lsd;
pub mod merge;

pub use hybrid::{HybridMsbSort, HybridSortConfig};
pub use lsd::LsdRadixSort;
pub use merge::{ParallelMergeSort, ParallelMergeSortConfig};

use crate::rowid::{ChunkLayout, RowId};
use crate::store::KeyStore;
use std::cmp::Ordering;
use std::sync::Arc;

/// Performance statistics for the last sort execution
#[derive(Debug, Clone, Default)]
pub struct SortStats {
    /// Total items sorted
    pub items_processed: usize,
    /// Processing time in microseconds
    pub processing_time_us: u64,
    /// Whether worker threads were used
    pub used_parallel: bool,
    /// Number of tasks submitted to the pool (0 on single-threaded paths)
    pub tasks_spawned: usize,
}

impl SortStats {
    /// Calculate processing rate in items per second
    pub fn items_per_second(&self) -> f64 {
        if self.processing_time_us == 0 {
            return 0.0;
        }
        (self.items_processed as f64) / (self.processing_time_us as f64 / 1_000_000.0)
    }
}

/// Full-key lexicographic ordering of row identifiers.
///
/// An owned, cloneable capability pairing the shared key store with the
/// chunk layout used to flatten row ids. Sort routines take it explicitly;
/// worker tasks clone it instead of capturing stack references, so no task
/// outlives the state it compares through.
#[derive(Debug, Clone)]
pub struct KeyComparator {
    store: Arc<KeyStore>,
    layout: ChunkLayout,
}

impl KeyComparator {
    /// Create a comparator over the given store and layout
    pub fn new(store: Arc<KeyStore>, layout: ChunkLayout) -> Self {
        Self { store, layout }
    }

    /// Compare two row identifiers by their full keys, byte-wise unsigned
    #[inline]
    pub fn compare(&self, a: RowId, b: RowId) -> Ordering {
        let key_a = self.store.key_unchecked(self.layout.flatten(a));
        let key_b = self.store.key_unchecked(self.layout.flatten(b));
        key_a.cmp(key_b)
    }

    /// Key bytes addressed by a row identifier
    #[inline]
    pub fn key_of(&self, row: RowId) -> &[u8] {
        self.store.key_unchecked(self.layout.flatten(row))
    }

    /// The layout this comparator flattens with
    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// The shared key store
    pub fn store(&self) -> &Arc<KeyStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparator(keys: Vec<Vec<u8>>, chunk_size: u16) -> KeyComparator {
        let store = Arc::new(KeyStore::new(keys).unwrap());
        KeyComparator::new(store, ChunkLayout::new(chunk_size).unwrap())
    }

    #[test]
    fn test_compare_through_indirection() {
        let cmp = comparator(vec![b"bb".to_vec(), b"aa".to_vec()], 2);
        let first = RowId::new(0, 0);
        let second = RowId::new(0, 1);
        assert_eq!(cmp.compare(first, second), Ordering::Greater);
        assert_eq!(cmp.compare(second, first), Ordering::Less);
        assert_eq!(cmp.compare(first, first), Ordering::Equal);
    }

    #[test]
    fn test_compare_across_chunks() {
        // Two chunks of two rows; keys laid out by flattened index
        let cmp = comparator(
            vec![b"dd".to_vec(), b"bb".to_vec(), b"aa".to_vec(), b"cc".to_vec()],
            2,
        );
        let in_chunk_one = RowId::new(1, 0); // "aa"
        let in_chunk_zero = RowId::new(0, 1); // "bb"
        assert_eq!(cmp.compare(in_chunk_one, in_chunk_zero), Ordering::Less);
        assert_eq!(cmp.key_of(in_chunk_one), b"aa");
    }

    #[test]
    fn test_stats_rate() {
        let stats = SortStats {
            items_processed: 1000,
            processing_time_us: 1000,
            used_parallel: false,
            tasks_spawned: 0,
        };
        assert_eq!(stats.items_per_second(), 1_000_000.0);

        let idle = SortStats::default();
        assert_eq!(idle.items_per_second(), 0.0);
    }
}
