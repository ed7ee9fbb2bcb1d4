//! Hybrid MSB-radix + comparison sort
//!
//! One single-threaded pass distributes elements into 256 buckets keyed by
//! a partition byte of their key; each non-empty bucket is then sorted
//! independently on the thread pool by full-key comparison, and the buckets
//! are concatenated in ascending byte order. Elements in bucket `b` all
//! carry partition-byte value `b`, so the concatenation is a total
//! lexicographic order.
//!
//! Buckets are moved into their worker task and returned from it; between
//! hand-off and fan-in exactly one thread touches any given bucket.

use crate::error::{Result, SortError};
use crate::pool::{ThreadPool, ThreadPoolConfig};
use crate::rowid::{ChunkLayout, RowId};
use crate::sort::{KeyComparator, SortStats};
use crate::store::{ByteKey, KeyStore};
use std::sync::Arc;
use std::time::Instant;

const RADIX: usize = 256;

/// The row-identifier path always partitions on the most significant byte.
const MSB_INDEX: usize = 0;

/// Configuration for the hybrid sorter
#[derive(Debug, Clone)]
pub struct HybridSortConfig {
    /// Worker threads for intra-bucket sorting
    pub workers: usize,
}

impl Default for HybridSortConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
        }
    }
}

/// Hybrid MSB-bucket sorter with a pool owned for its whole lifetime.
///
/// The pool is acquired at construction and shut down on drop, so repeated
/// sorts reuse the same workers instead of respawning threads per call.
pub struct HybridMsbSort {
    pool: ThreadPool,
    stats: SortStats,
}

impl HybridMsbSort {
    /// Create a sorter with hardware-concurrency workers
    pub fn new() -> Result<Self> {
        Self::with_config(HybridSortConfig::default())
    }

    /// Create a sorter with a custom configuration
    pub fn with_config(config: HybridSortConfig) -> Result<Self> {
        let pool = ThreadPool::new(ThreadPoolConfig {
            workers: config.workers,
        })?;
        Ok(Self {
            pool,
            stats: SortStats::default(),
        })
    }

    /// Sort row identifiers by the full keys they address.
    ///
    /// Distribution reads the most significant key byte through the store;
    /// every bucket then sorts under the explicit [`KeyComparator`]. Key
    /// length uniformity is guaranteed by [`KeyStore`] construction and is
    /// not re-checked here. Out-of-bounds row identifiers are the caller's
    /// responsibility. Empty input returns without touching the pool.
    ///
    /// Not stable: identical keys may appear in either relative order.
    /// On a worker failure the input may be left partially rebuilt.
    pub fn sort_rows(
        &mut self,
        store: &Arc<KeyStore>,
        layout: ChunkLayout,
        rows: &mut Vec<RowId>,
    ) -> Result<()> {
        let start_time = Instant::now();

        if rows.is_empty() {
            return Ok(());
        }
        // Zero-length keys are all equal; any order is sorted
        if store.key_len() == 0 {
            return Ok(());
        }

        let comparator = KeyComparator::new(store.clone(), layout);
        let total_rows = rows.len();

        // Phase 1: single-threaded distribution by MSB
        let mut buckets: Vec<Vec<RowId>> = (0..RADIX).map(|_| Vec::new()).collect();
        for &row in rows.iter() {
            let value = comparator.key_of(row)[MSB_INDEX];
            buckets[value as usize].push(row);
        }
        rows.clear();

        // Phase 2: one pool task per non-empty bucket, bucket moved in
        let mut handles = Vec::new();
        for mut bucket in buckets.into_iter() {
            if bucket.is_empty() {
                continue;
            }
            let comparator = comparator.clone();
            let handle = self.pool.submit(move || {
                bucket.sort_unstable_by(|&a, &b| comparator.compare(a, b));
                bucket
            })?;
            handles.push(handle);
        }
        let tasks_spawned = handles.len();
        log::debug!(
            "hybrid sort: {} buckets submitted for {} rows",
            tasks_spawned,
            total_rows
        );

        // Phase 3: fan-in, then concatenate in ascending bucket order.
        // Handles were pushed in ascending partition-byte order.
        for handle in handles {
            let sorted = handle.wait()?;
            rows.extend(sorted);
        }

        let elapsed = start_time.elapsed();
        self.stats = SortStats {
            items_processed: rows.len(),
            processing_time_us: elapsed.as_micros() as u64,
            used_parallel: true,
            tasks_spawned,
        };

        Ok(())
    }

    /// Sort physical keys by bucketing on the byte at `partition_byte`.
    ///
    /// This path validates uniform key length over the full input before
    /// moving anything, then runs the same bucket/sort/concatenate plan
    /// with keys owned by the buckets. Partition byte 0 yields a global
    /// lexicographic order; any other byte still fully sorts each bucket
    /// but concatenates by that byte's value. Not stable.
    pub fn sort_keys(&mut self, keys: &mut Vec<ByteKey>, partition_byte: usize) -> Result<()> {
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
        if partition_byte >= key_len {
            return Err(SortError::configuration(format!(
                "partition byte {} out of range for {}-byte keys",
                partition_byte, key_len
            )));
        }

        let mut buckets: Vec<Vec<ByteKey>> = (0..RADIX).map(|_| Vec::new()).collect();
        for key in keys.drain(..) {
            let value = key[partition_byte] as usize;
            buckets[value].push(key);
        }

        let mut handles = Vec::new();
        for mut bucket in buckets.into_iter() {
            if bucket.is_empty() {
                continue;
            }
            let handle = self.pool.submit(move || {
                bucket.sort_unstable();
                bucket
            })?;
            handles.push(handle);
        }
        let tasks_spawned = handles.len();

        for handle in handles {
            let sorted = handle.wait()?;
            keys.extend(sorted);
        }

        let elapsed = start_time.elapsed();
        self.stats = SortStats {
            items_processed: keys.len(),
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
