//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Misses are not errors: `get` reports them as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Construction was attempted with a capacity of zero
    #[error("Invalid capacity: cache capacity must be at least 1")]
    InvalidCapacity,

    /// Cache is full and none of its entries has expired
    #[error("Cache saturated: all {capacity} entries are still live")]
    Saturated {
        /// Capacity of the refusing cache
        capacity: usize,
    },
}

impl CacheError {
    /// Returns true if the error is a saturation refusal.
    pub fn is_saturated(&self) -> bool {
        matches!(self, CacheError::Saturated { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
