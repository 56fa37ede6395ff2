//! Error types for rangecache

use std::fmt;

/// Result type alias for rangecache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache and range-sum operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Query bounds are reversed or fall outside the array
    OutOfRangeQuery {
        /// Requested left bound
        left: usize,
        /// Requested right bound
        right: usize,
        /// Length of the backing array
        len: usize,
    },

    /// Update index falls outside the array (only reported by strict updates)
    OutOfRangeUpdate {
        /// Requested index, `None` if it was not representable as `usize`
        index: Option<usize>,
        /// Length of the backing array
        len: usize,
    },

    /// Range sum does not fit in `i64`
    SumOverflow {
        /// Requested left bound
        left: usize,
        /// Requested right bound
        right: usize,
    },

    /// Cache capacity must be at least 1
    ZeroCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRangeQuery { left, right, len } => write!(
                f,
                "Range [{}, {}] out of bounds for array of length {}",
                left, right, len
            ),
            Error::OutOfRangeUpdate { index: Some(index), len } => write!(
                f,
                "Update index {} out of bounds for array of length {}",
                index, len
            ),
            Error::OutOfRangeUpdate { index: None, len } => write!(
                f,
                "Update index is negative or unrepresentable (array length {})",
                len
            ),
            Error::SumOverflow { left, right } => {
                write!(f, "Sum of range [{}, {}] overflows i64", left, right)
            }
            Error::ZeroCapacity => write!(f, "Cache capacity must be greater than 0"),
        }
    }
}

impl std::error::Error for Error {}
