//! Chunked parallel merge sort over row identifiers
//!
//! The input is split into contiguous chunks whose boundaries depend only
//! on input length and chunk count, never on key bytes, so execution time
//! is largely independent of the key distribution. Chunks sort in parallel
//! on the pool, then merge pairwise in rounds until at most two remain; the
//! final merge happens on the calling thread.

use crate::error::Result;
use crate::pool::{ThreadPool, ThreadPoolConfig};
use crate::rowid::{ChunkLayout, RowId};
use crate::sort::{KeyComparator, SortStats};
use crate::store::KeyStore;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Configuration for the parallel merge sorter
#[derive(Debug, Clone)]
pub struct ParallelMergeSortConfig {
    /// Number of contiguous chunks (and pool workers); at least 2
    pub chunks: usize,
}

impl Default for ParallelMergeSortConfig {
    fn default() -> Self {
        Self {
            chunks: num_cpus::get().max(2),
        }
    }
}

/// Parallel merge sorter with a pool owned for its whole lifetime
pub struct ParallelMergeSort {
    config: ParallelMergeSortConfig,
    pool: ThreadPool,
    stats: SortStats,
}

impl ParallelMergeSort {
    /// Create a sorter with hardware-concurrency chunking
    pub fn new() -> Result<Self> {
        Self::with_config(ParallelMergeSortConfig::default())
    }

    /// Create a sorter with a custom configuration
    pub fn with_config(config: ParallelMergeSortConfig) -> Result<Self> {
        let workers = config.chunks.max(2);
        let pool = ThreadPool::new(ThreadPoolConfig { workers })?;
        Ok(Self {
            config: ParallelMergeSortConfig { chunks: workers },
            pool,
            stats: SortStats::default(),
        })
    }

    /// Sort row identifiers by the full keys they address.
    ///
    /// Deterministic for a given input order: chunk boundaries derive from
    /// length and chunk count alone. Key length uniformity follows from
    /// [`KeyStore`] construction; not stable; empty input returns without
    /// touching the pool. On a worker failure the input may be left
    /// partially consumed.
    pub fn sort(
        &mut self,
        store: &Arc<KeyStore>,
        layout: ChunkLayout,
        rows: &mut Vec<RowId>,
    ) -> Result<()> {
        let start_time = Instant::now();

        if rows.is_empty() {
            return Ok(());
        }

        let comparator = KeyComparator::new(store.clone(), layout);
        let total_rows = rows.len();
        let chunk_size = total_rows.div_ceil(self.config.chunks);
        let mut tasks_spawned = 0;

        // Split into contiguous chunks, moving the row ids out
        let mut chunks: Vec<Vec<RowId>> = Vec::with_capacity(self.config.chunks);
        {
            let mut drained = rows.drain(..);
            loop {
                let chunk: Vec<RowId> = drained.by_ref().take(chunk_size).collect();
                if chunk.is_empty() {
                    break;
                }
                chunks.push(chunk);
            }
        }

        // Sort every chunk in parallel
        let mut handles = Vec::with_capacity(chunks.len());
        for mut chunk in chunks.drain(..) {
            let comparator = comparator.clone();
            handles.push(self.pool.submit(move || {
                chunk.sort_unstable_by(|&a, &b| comparator.compare(a, b));
                chunk
            })?);
        }
        tasks_spawned += handles.len();
        for handle in handles {
            chunks.push(handle.wait()?);
        }

        // Merge adjacent pairs in rounds until at most two runs remain;
        // an odd trailing run carries forward unmerged
        while chunks.len() > 2 {
            log::debug!("merge round over {} runs", chunks.len());
            let mut handles = Vec::with_capacity(chunks.len() / 2);
            let mut leftover = None;
            let mut runs = chunks.into_iter();
            while let Some(left) = runs.next() {
                match runs.next() {
                    Some(right) => {
                        let comparator = comparator.clone();
                        handles.push(
                            self.pool
                                .submit(move || merge_runs(left, right, &comparator))?,
                        );
                    }
                    None => leftover = Some(left),
                }
            }
            tasks_spawned += handles.len();

            let mut next = Vec::with_capacity(handles.len() + 1);
            for handle in handles {
                next.push(handle.wait()?);
            }
            if let Some(run) = leftover {
                next.push(run);
            }
            chunks = next;
        }

        // Final merge on the calling thread
        let merged = match (chunks.pop(), chunks.pop()) {
            (Some(right), Some(left)) => merge_runs(left, right, &comparator),
            (Some(only), None) => only,
            _ => Vec::new(),
        };
        *rows = merged;

        let elapsed = start_time.elapsed();
        self.stats = SortStats {
            items_processed: total_rows,
            processing_time_us: elapsed.as_micros() as u64,
            used_parallel: true,
            tasks_spawned,
        };

        Ok(())
    }

    /// Statistics from the last execution
    pub fn stats(&self) -> &SortStats {
        &self.stats
    }
}

/// Standard two-way merge of sorted runs; ties take from the left run
fn merge_runs(left: Vec<RowId>, right: Vec<RowId>, comparator: &KeyComparator) -> Vec<RowId> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left_iter = left.into_iter().peekable();
    let mut right_iter = right.into_iter().peekable();

    while let (Some(&a), Some(&b)) = (left_iter.peek(), right_iter.peek()) {
        if comparator.compare(a, b) != Ordering::Greater {
            merged.push(left_iter.next().expect("peeked"));
        } else {
            merged.push(right_iter.next().expect("peeked"));
        }
    }
    merged.extend(left_iter);
    merged.extend(right_iter);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::generate_keys;
    use crate::rowid::generate_row_ids;

    fn dereference(cmp: &KeyComparator, rows: &[RowId]) -> Vec<Vec<u8>> {
        rows.iter().map(|&r| cmp.key_of(r).to_vec()).collect()
    }

    #[test]
    fn test_total_order_and_permutation() {
        let keys = generate_keys(1000, 8, 5);
        let layout = ChunkLayout::new(128).unwrap();
        let store = Arc::new(KeyStore::new(keys).unwrap());
        let mut rows = generate_row_ids(store.len(), layout);

        let mut sorter = ParallelMergeSort::new().unwrap();
        sorter.sort(&store, layout, &mut rows).unwrap();

        let cmp = KeyComparator::new(store.clone(), layout);
        let derefed = dereference(&cmp, &rows);
        assert!(derefed.windows(2).all(|w| w[0] <= w[1]));

        let mut flat: Vec<usize> = rows.iter().map(|&r| layout.flatten(r)).collect();
        flat.sort_unstable();
        assert_eq!(flat, (0..store.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input_skips_pool() {
        let store = Arc::new(KeyStore::new(Vec::new()).unwrap());
        let mut rows = Vec::new();
        let mut sorter = ParallelMergeSort::new().unwrap();
        sorter.sort(&store, ChunkLayout::default(), &mut rows).unwrap();
        assert!(rows.is_empty());
        assert_eq!(sorter.stats().tasks_spawned, 0);
    }

    #[test]
    fn test_tiny_inputs() {
        let layout = ChunkLayout::new(4).unwrap();
        for n in 1..=5 {
            let keys = generate_keys(n, 3, n as u64);
            let store = Arc::new(KeyStore::new(keys).unwrap());
            let mut rows = generate_row_ids(n, layout);

            let mut sorter = ParallelMergeSort::new().unwrap();
            sorter.sort(&store, layout, &mut rows).unwrap();

            let cmp = KeyComparator::new(store, layout);
            let derefed = dereference(&cmp, &rows);
            assert!(derefed.windows(2).all(|w| w[0] <= w[1]), "n = {}", n);
            assert_eq!(rows.len(), n);
        }
    }

    #[test]
    fn test_deterministic_given_input_order() {
        let keys = generate_keys(600, 6, 31);
        let layout = ChunkLayout::new(100).unwrap();
        let store = Arc::new(KeyStore::new(keys).unwrap());

        let mut first = generate_row_ids(store.len(), layout);
        let mut second = first.clone();

        let config = ParallelMergeSortConfig { chunks: 4 };
        let mut sorter = ParallelMergeSort::with_config(config.clone()).unwrap();
        sorter.sort(&store, layout, &mut first).unwrap();
        let mut sorter = ParallelMergeSort::with_config(config).unwrap();
        sorter.sort(&store, layout, &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_many_chunks_exercise_merge_rounds() {
        let keys = generate_keys(700, 5, 23);
        let layout = ChunkLayout::new(64).unwrap();
        let store = Arc::new(KeyStore::new(keys).unwrap());
        let mut rows = generate_row_ids(store.len(), layout);

        // 7 chunks forces rounds: 7 -> 4 -> 2 -> final
        let mut sorter = ParallelMergeSort::with_config(ParallelMergeSortConfig { chunks: 7 })
            .unwrap();
        sorter.sort(&store, layout, &mut rows).unwrap();

        let cmp = KeyComparator::new(store, layout);
        let derefed = dereference(&cmp, &rows);
        assert!(derefed.windows(2).all(|w| w[0] <= w[1]));
        // 7 chunk sorts + 3 + 2 merge tasks
        assert_eq!(sorter.stats().tasks_spawned, 12);
    }

    #[test]
    fn test_merge_runs_tie_left_biased() {
        let store = Arc::new(
            KeyStore::new(vec![b"aa".to_vec(), b"aa".to_vec(), b"ab".to_vec()]).unwrap(),
        );
        let layout = ChunkLayout::new(4).unwrap();
        let cmp = KeyComparator::new(store, layout);

        let left = vec![RowId::new(0, 0), RowId::new(0, 2)];
        let right = vec![RowId::new(0, 1)];
        let merged = merge_runs(left, right, &cmp);
        // The "aa" from the left run precedes the equal "aa" from the right
        assert_eq!(merged[0], RowId::new(0, 0));
        assert_eq!(merged[1], RowId::new(0, 1));
        assert_eq!(merged[2], RowId::new(0, 2));
    }
}
