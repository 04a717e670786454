//! Cache Module
//!
//! Provides in-memory caching with LRU ordering and lazy TTL expiration.

mod entry;
mod lru;
mod stats;
mod store;
mod ttl_lru;


// Re-export public types
pub use entry::{CacheEntry, Expiry};
pub use lru::{Iter, LruList};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl_lru::TtlLruCache;
