//! Row identifiers and chunk addressing
//!
//! A [`RowId`] locates one logical record as a (chunk id, offset) pair
//! without owning any key bytes. The [`ChunkLayout`] carries the chunk size
//! as an explicit value threaded through every flatten site; two concurrent
//! sorts with different chunk sizes cannot interfere because nothing about
//! the addressing scheme is process-global.

use crate::error::{Result, SortError};
use std::env;

/// Environment variable consulted by [`ChunkLayout::from_env`]
pub const CHUNK_SIZE_ENV: &str = "ROWSORT_CHUNK_SIZE";

/// Compact locator for one logical record: which chunk, and where in it.
///
/// A pure value type with no intrinsic ordering: two row ids compare only
/// through the keys they address, so there is deliberately no `Ord`
/// implementation here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    /// Chunk the record lives in
    pub chunk_id: u32,
    /// Offset of the record within its chunk
    pub chunk_offset: u16,
}

impl RowId {
    /// Create a row identifier
    #[inline]
    pub fn new(chunk_id: u32, chunk_offset: u16) -> Self {
        Self {
            chunk_id,
            chunk_offset,
        }
    }
}

/// Explicit chunk-size configuration for flattening row identifiers into
/// key-store indices.
///
/// The chunk size must be fixed before any row identifiers are generated
/// and must match the layout used to flatten them for their whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    chunk_size: u16,
}

impl ChunkLayout {
    /// Create a layout with the given chunk size. Zero rows per chunk can
    /// never address anything, so it is rejected up front.
    pub fn new(chunk_size: u16) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SortError::configuration("chunk size must be non-zero"));
        }
        Ok(Self { chunk_size })
    }

    /// Initialize from the `ROWSORT_CHUNK_SIZE` environment variable,
    /// falling back to the default on absent or unparsable values.
    pub fn from_env() -> Self {
        let chunk_size = env::var(CHUNK_SIZE_ENV)
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .filter(|&v| v != 0)
            .unwrap_or(u16::MAX);
        if chunk_size != u16::MAX {
            log::debug!("chunk size {} from {}", chunk_size, CHUNK_SIZE_ENV);
        }
        Self { chunk_size }
    }

    /// Rows per chunk
    #[inline]
    pub fn chunk_size(&self) -> u16 {
        self.chunk_size
    }

    /// Flatten a row identifier into its key-store index. No bounds check
    /// here; callers own the in-bounds invariant.
    #[inline(always)]
    pub fn flatten(&self, row: RowId) -> usize {
        row.chunk_id as usize * self.chunk_size as usize + row.chunk_offset as usize
    }

    /// Number of chunks needed for `num_rows` records
    pub fn chunks_for(&self, num_rows: usize) -> usize {
        num_rows.div_ceil(self.chunk_size as usize)
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self {
            chunk_size: u16::MAX,
        }
    }
}

/// Generate row identifiers covering `num_rows` logical records under the
/// given layout: chunk ids in increasing order, offsets `0..chunk_size`
/// within each chunk. Every produced identifier flattens to a distinct
/// index in `0..num_rows`.
pub fn generate_row_ids(num_rows: usize, layout: ChunkLayout) -> Vec<RowId> {
    let chunk_size = layout.chunk_size() as usize;
    let num_chunks = layout.chunks_for(num_rows);
    log::debug!("generating {} row ids over {} chunks", num_rows, num_chunks);

    let mut row_ids = Vec::with_capacity(num_rows);
    for chunk_id in 0..num_chunks {
        let rows_in_chunk = (num_rows - chunk_id * chunk_size).min(chunk_size);
        for chunk_offset in 0..rows_in_chunk {
            row_ids.push(RowId::new(chunk_id as u32, chunk_offset as u16));
        }
    }
    row_ids
}
