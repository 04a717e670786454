//! Thread-safe TTL-LRU cache
//!
//! Wraps a [`CacheStore`] in a single mutex. Every operation, lookups
//! included, reorders the recency list, so all callers take the same
//! exclusive lock.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::models::CacheSnapshot;

// == TTL LRU Cache ==
/// Fixed-capacity, thread-safe cache with LRU ordering and lazy TTL expiry.
///
/// When full, a new key can only take the place of an expired entry; if
/// every entry is still live the insert fails with
/// [`CacheError::Saturated`](crate::error::CacheError::Saturated).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_lru_cache::TtlLruCache;
///
/// let cache = TtlLruCache::new(2).unwrap();
/// cache.add("a", 1).unwrap();
/// cache.add_with_ttl("b", 2, Duration::from_secs(60)).unwrap();
///
/// assert_eq!(cache.get(&"a"), Some(1));
/// assert!(cache.add("c", 3).unwrap_err().is_saturated());
/// ```
pub struct TtlLruCache<K, V> {
    /// Immutable after construction, read without locking
    capacity: usize,
    inner: Mutex<CacheStore<K, V>>,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructors ==
    /// Creates a cache whose `add` entries never expire.
    ///
    /// Fails with `InvalidCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_default_ttl(capacity, None)
    }

    /// Creates a cache whose `add` entries expire after `default_ttl`.
    pub fn with_default_ttl(capacity: usize, default_ttl: Option<Duration>) -> Result<Self> {
        let store = CacheStore::new(capacity, default_ttl)?;
        Ok(Self {
            capacity,
            inner: Mutex::new(store),
        })
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_default_ttl(config.capacity, config.default_ttl)
    }

    // The store is consistent whenever the lock is released, so a poisoned
    // lock is safe to take over.
    fn lock(&self) -> MutexGuard<'_, CacheStore<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Capacity / Length ==
    pub fn cap(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries held, including expired entries that
    /// have not been read or evicted yet.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Clear ==
    /// Removes every entry. Capacity is unchanged.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // == Add ==
    /// Stores a value under the cache's default TTL.
    ///
    /// Without a configured default the entry never expires.
    pub fn add(&self, key: K, value: V) -> Result<()> {
        self.lock().insert_default(key, value, Instant::now())
    }

    /// Stores a value that expires `ttl` from now.
    ///
    /// A zero `ttl` makes the entry eligible for eviction as soon as the
    /// clock advances.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        self.lock().insert(key, value, Some(ttl), Instant::now())
    }

    // == Remove ==
    /// Deletes a key. Absent keys are ignored.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().remove(key);
    }

    /// Deletes a key and hands back its value.
    pub fn take<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().remove(key)
    }

    // == Purge ==
    /// Drops every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired(Instant::now())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().contains_key(key)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Runs the store's consistency checks under the lock.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        self.lock().check_invariants()
    }
}

impl<K, V> TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Get ==
    /// Returns a copy of a live value and marks it most recently used.
    ///
    /// Expired entries are dropped and reported as absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().get(key, Instant::now()).cloned()
    }

    /// Returns a copy of a live value without touching recency or expiry state.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().peek(key, Instant::now()).cloned()
    }

    // == Snapshot ==
    /// Copies out all entries, most recently used first, for display.
    ///
    /// Never promotes or evicts anything.
    pub fn snapshot(&self) -> CacheSnapshot<K, V> {
        self.lock().snapshot(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert!(matches!(
            TtlLruCache::<String, String>::new(0),
            Err(CacheError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_cap_and_len() {
        let cache = TtlLruCache::new(4).unwrap();
        assert_eq!(cache.cap(), 4);
        assert!(cache.is_empty());

        cache.add("a", "aaa").unwrap();
        cache.add("b", "bbb").unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.cap(), 4);
    }

    #[test]
    fn test_add_without_ttl_never_expires() {
        let cache = TtlLruCache::new(2).unwrap();
        cache.add("a", 1).unwrap();

        thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get(&"a"), Some(1));
    }

    #[test]
    fn test_add_with_zero_ttl_expires_immediately() {
        let cache = TtlLruCache::new(2).unwrap();
        cache.add_with_ttl("a", 1, Duration::ZERO).unwrap();

        thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_default_ttl_applies_to_add() {
        let cache = TtlLruCache::with_default_ttl(2, Some(Duration::from_millis(20))).unwrap();
        cache.add("a", 1).unwrap();

        assert_eq!(cache.peek(&"a"), Some(1));
        thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.peek(&"a"), None);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            capacity: 3,
            default_ttl: None,
        };
        let cache: TtlLruCache<u32, u32> = TtlLruCache::from_config(&config).unwrap();
        assert_eq!(cache.cap(), 3);
    }

    #[test]
    fn test_string_keys_lookup_by_str() {
        let cache = TtlLruCache::new(2).unwrap();
        cache.add("key".to_string(), vec![1u8, 2, 3]).unwrap();

        assert_eq!(cache.get("key"), Some(vec![1, 2, 3]));
        assert!(cache.contains_key("key"));
        cache.remove("key");
        assert!(!cache.contains_key("key"));
    }

    #[test]
    fn test_take_returns_value() {
        let cache = TtlLruCache::new(2).unwrap();
        cache.add("a", 10).unwrap();

        assert_eq!(cache.take(&"a"), Some(10));
        assert_eq!(cache.take(&"a"), None);
    }

    #[test]
    fn test_saturated_insert_reports_error() {
        let cache = TtlLruCache::new(1).unwrap();
        cache.add("a", 1).unwrap();

        let err = cache.add("b", 2).unwrap_err();
        assert_eq!(err, CacheError::Saturated { capacity: 1 });
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.stats().rejections, 1);
    }

    #[test]
    fn test_snapshot_does_not_promote() {
        let cache = TtlLruCache::new(3).unwrap();
        cache.add("a", 1).unwrap();
        cache.add("b", 2).unwrap();

        let before: Vec<_> = cache.snapshot().keys().copied().collect();
        let after: Vec<_> = cache.snapshot().keys().copied().collect();

        assert_eq!(before, vec!["b", "a"]);
        assert_eq!(before, after);
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let cache = Arc::new(TtlLruCache::new(2).unwrap());
        cache.add("a", 1).unwrap();

        let poisoner = Arc::clone(&cache);
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(cache.get(&"a"), Some(1));
        cache.check_invariants().unwrap();
    }
}
