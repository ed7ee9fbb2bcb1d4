//! Error handling for the rowsort library
//!
//! A single error enum covers every failure the sort paths can surface:
//! validation errors raised before any input mutation, addressing errors,
//! configuration mistakes, and worker-task failures propagated at the
//! fan-in barrier.

use thiserror::Error;

/// Main error type for the rowsort library
#[derive(Error, Debug)]
pub enum SortError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Keys of differing lengths passed to a uniform-length component
    #[error("key length mismatch at index {index}: expected {expected}, got {actual}")]
    KeyLengthMismatch {
        /// Canonical key length (taken from the first key)
        expected: usize,
        /// Length of the offending key
        actual: usize,
        /// Position of the offending key in the input
        index: usize,
    },

    /// Index out of bounds access
    #[error("out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Configuration or parameter errors
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

    /// A worker task panicked or its result channel was severed
    #[error("task failed: {message}")]
    TaskFailed {
        /// Description of the failure
        message: String,
    },
}

impl SortError {
    /// Create a key length mismatch error
    pub fn key_length_mismatch(expected: usize, actual: usize, index: usize) -> Self {
        Self::KeyLengthMismatch {
            expected,
            actual,
            index,
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failed<S: Into<String>>(message: S) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::KeyLengthMismatch { .. } => false,
            Self::OutOfBounds { .. } => false,
            Self::Configuration { .. } => false,
            Self::TaskFailed { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::KeyLengthMismatch { .. } => "key_length",
            Self::OutOfBounds { .. } => "bounds",
            Self::Configuration { .. } => "config",
            Self::TaskFailed { .. } => "task",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SortError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(SortError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}
