//! Snapshot models for cache inspection
//!
//! Read-only views of the cache contents, serializable for diagnostic output.

use std::time::Instant;

use serde::Serialize;

use crate::cache::CacheEntry;

/// A single entry as seen at the moment the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot<K, V> {
    /// The entry's key
    pub key: K,
    /// Copy of the stored value
    pub value: V,
    /// Milliseconds left before expiry, `None` if the entry never expires
    pub expires_in_ms: Option<u64>,
}

impl<K: Clone, V: Clone> EntrySnapshot<K, V> {
    /// Captures an entry relative to `now`.
    pub fn new(entry: &CacheEntry<K, V>, now: Instant) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            expires_in_ms: entry
                .expiry
                .remaining(now)
                .map(|left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}

/// Whole-cache view, entries ordered from most to least recently used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheSnapshot<K, V> {
    /// Configured capacity
    pub capacity: usize,
    /// Number of entries physically present
    pub len: usize,
    /// Entries, most recently used first
    pub entries: Vec<EntrySnapshot<K, V>>,
}

impl<K, V> CacheSnapshot<K, V> {
    /// Returns the keys in recency order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|entry| &entry.key)
    }
}
