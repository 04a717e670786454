//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the LRU order list and
//! lazy TTL expiration. The store is single-threaded; `TtlLruCache` wraps it
//! in a lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Expiry, LruList};
use crate::error::{CacheError, Result};
use crate::models::{CacheSnapshot, EntrySnapshot};

// == Cache Store ==
/// Fixed-capacity cache storage with expired-first eviction.
///
/// Every operation that depends on the clock takes `now` explicitly.
pub struct CacheStore<K, V> {
    /// Key -> handle into `order`
    index: HashMap<K, usize>,
    /// Entries from most to least recently used
    order: LruList<CacheEntry<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL used by `insert_default`
    default_ttl: Option<Duration>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold (at least 1)
    /// * `default_ttl` - TTL for entries inserted without one, `None` = never expire
    pub fn new(capacity: usize, default_ttl: Option<Duration>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
        })
    }

    // == Insert ==
    /// Stores a key-value pair that expires `ttl` after `now` (`None` = never).
    ///
    /// - An existing key gets its value and deadline replaced and is promoted.
    /// - A new key takes a free slot if there is one.
    /// - Otherwise the order is scanned from the least recently used end for
    ///   the first expired entry, which is evicted to make room.
    /// - If nothing has expired the insert is refused with
    ///   [`CacheError::Saturated`] and the store is left untouched.
    pub fn insert(&mut self, key: K, value: V, ttl: Option<Duration>, now: Instant) -> Result<()> {
        let expiry = Expiry::after(ttl, now);

        // Overwrite case
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(idx) {
                entry.refresh(value, expiry);
            }
            self.order.move_to_front(idx);
            return Ok(());
        }

        if self.order.len() >= self.capacity {
            let Some(victim) = self.find_expired_victim(now) else {
                self.stats.record_rejection();
                debug!(capacity = self.capacity, "Insert refused: cache saturated");
                return Err(CacheError::Saturated {
                    capacity: self.capacity,
                });
            };
            self.unlink(victim);
            self.stats.record_eviction();
            debug!("Evicted expired entry to make room");
        }

        let idx = self.order.push_front(CacheEntry::new(key.clone(), value, expiry));
        self.index.insert(key, idx);
        self.stats.set_total_entries(self.order.len());
        Ok(())
    }

    /// Stores a key-value pair using the store's default TTL.
    pub fn insert_default(&mut self, key: K, value: V, now: Instant) -> Result<()> {
        self.insert(key, value, self.default_ttl, now)
    }

    // Walks from the back toward the front for the first expired entry.
    fn find_expired_victim(&self, now: Instant) -> Option<usize> {
        let mut cursor = self.order.back();
        while let Some(idx) = cursor {
            if self.order.get(idx).is_some_and(|entry| entry.is_expired(now)) {
                return Some(idx);
            }
            cursor = self.order.prev(idx);
        }
        None
    }

    // == Get ==
    /// Retrieves a live value by key and marks it most recently used.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.order.get(idx).map_or(true, |entry| entry.is_expired(now)) {
            self.unlink(idx);
            self.stats.record_expired(1);
            self.stats.record_miss();
            debug!("Dropped expired entry on read");
            return None;
        }

        self.stats.record_hit();
        self.order.move_to_front(idx);
        self.order.get(idx).map(|entry| &entry.value)
    }

    // == Peek ==
    /// Returns a live value without promoting it or dropping it if expired.
    pub fn peek<Q>(&self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.order
            .get(idx)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| &entry.value)
    }

    /// Checks whether the key is physically present, expired or not.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        let entry = self.order.remove(idx)?;
        self.stats.set_total_entries(self.order.len());
        Some(entry.value)
    }

    // == Clear ==
    /// Drops every entry. Capacity and statistics counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes all entries expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<usize> = self
            .order
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(idx, _)| idx)
            .collect();

        let count = expired.len();
        for idx in expired {
            self.unlink(idx);
        }

        if count > 0 {
            self.stats.record_expired(count);
            debug!(count, "Purged expired entries");
        }
        count
    }

    // Drops the entry at `idx` from both the order and the index.
    fn unlink(&mut self, idx: usize) {
        if let Some(entry) = self.order.remove(idx) {
            self.index.remove(&entry.key);
        }
        self.stats.set_total_entries(self.order.len());
    }

    // == Introspection ==
    /// Returns the current number of entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }

    // == Snapshot ==
    /// Captures every entry from most to least recently used.
    ///
    /// Has no side effects: nothing is promoted and expired entries are
    /// listed as they are.
    pub fn snapshot(&self, now: Instant) -> CacheSnapshot<K, V>
    where
        V: Clone,
    {
        let entries = self
            .order
            .iter()
            .map(|(_, entry)| EntrySnapshot::new(entry, now))
            .collect();

        CacheSnapshot {
            capacity: self.capacity,
            len: self.order.len(),
            entries,
        }
    }

    // == Invariants ==
    /// Verifies that index and order describe the same set of keys.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.index.len() != self.order.len() {
            return Err(format!(
                "index holds {} keys but order holds {} entries",
                self.index.len(),
                self.order.len()
            ));
        }
        if self.order.len() > self.capacity {
            return Err(format!(
                "{} entries exceed capacity {}",
                self.order.len(),
                self.capacity
            ));
        }

        let mut walked = 0;
        for (idx, entry) in self.order.iter() {
            walked += 1;
            if self.index.get(&entry.key) != Some(&idx) {
                return Err(format!("entry at slot {idx} is not indexed under its key"));
            }
        }
        if walked != self.order.len() {
            return Err(format!(
                "walked {walked} linked entries but order reports {}",
                self.order.len()
            ));
        }

        Ok(())
    }
}
