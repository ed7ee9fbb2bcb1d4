//! # Rowsort: Bulk Sorting of Fixed-Length Binary Keys
//!
//! This crate sorts large sets of fixed-width byte keys the way a database
//! sorts composite index entries: by ordering lightweight row identifiers
//! that point into an immutable key store, instead of physically moving
//! the key bytes.
//!
//! ## Sorting paths
//!
//! - **Hybrid MSB sort**: bucket row identifiers by the most significant
//!   key byte, sort each bucket in parallel by full-key comparison,
//!   concatenate in byte order.
//! - **LSD radix sort**: stable byte-wise counting sort over physical
//!   keys, single-threaded and deterministic.
//! - **Parallel merge sort**: contiguous chunking with data-independent
//!   boundaries, parallel chunk sorts, pairwise merge rounds.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowsort::{
//!     generate_keys, generate_row_ids, ChunkLayout, HybridMsbSort, KeyComparator, KeyStore,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> rowsort::Result<()> {
//! let layout = ChunkLayout::new(1000)?;
//! let store = Arc::new(KeyStore::new(generate_keys(5000, 16, 42))?);
//! let mut rows = generate_row_ids(store.len(), layout);
//!
//! let mut sorter = HybridMsbSort::new()?;
//! sorter.sort_rows(&store, layout, &mut rows)?;
//!
//! let comparator = KeyComparator::new(store, layout);
//! assert!(rows.windows(2).all(|w| {
//!     comparator.compare(w[0], w[1]) != std::cmp::Ordering::Greater
//! }));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod keygen;
pub mod pool;
pub mod rowid;
pub mod sort;
pub mod store;
pub mod timing;

// Re-export core types
pub use error::{Result, SortError};
pub use rowid::{generate_row_ids, ChunkLayout, RowId, CHUNK_SIZE_ENV};
pub use store::{ByteKey, KeyStore};

// Re-export the pool surface
pub use pool::{PoolStats, TaskHandle, ThreadPool, ThreadPoolConfig};

// Re-export the sorting engines
pub use sort::{
    HybridMsbSort, HybridSortConfig, KeyComparator, LsdRadixSort, ParallelMergeSort,
    ParallelMergeSortConfig, SortStats,
};

// Re-export test/bench collaborators
pub use keygen::{format_key, generate_keys};
pub use timing::Timer;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently no-op, for future use)
pub fn init() {
    log::debug!("Initializing rowsort v{}", VERSION);
}
