//! TTL LRU Cache - A fixed-capacity, thread-safe key/value cache
//!
//! Combines least-recently-used ordering with optional per-entry TTL.
//! Expiry is lazy: entries are checked when read or when a full cache
//! scans for an expired entry to replace.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheStats, TtlLruCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use models::{CacheSnapshot, EntrySnapshot};
