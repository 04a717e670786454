//! Models for inspecting the cache
//!
//! This module defines the serializable views handed to callers that
//! want to print or log the cache contents.

pub mod snapshot;

// Re-export commonly used types
pub use snapshot::{CacheSnapshot, EntrySnapshot};
