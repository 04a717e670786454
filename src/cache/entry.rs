//! Cache Entry Module
//!
//! Defines the expiry model and the node stored for each cached key.

use std::time::{Duration, Instant};

// == Expiry ==
/// Absolute expiry deadline of an entry.
///
/// `Never` and an elapsed deadline are distinct states: an entry added
/// without a TTL stays live until removed, while a zero TTL produces a
/// deadline equal to the insertion instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry never expires
    Never,
    /// The entry expires once the clock moves past this instant
    At(Instant),
}

impl Expiry {
    // == Constructor ==
    /// Computes the deadline for an optional TTL measured from `now`.
    ///
    /// A TTL too large to be represented saturates to `Never`.
    pub fn after(ttl: Option<Duration>, now: Instant) -> Self {
        match ttl {
            Some(ttl) => now.checked_add(ttl).map_or(Expiry::Never, Expiry::At),
            None => Expiry::Never,
        }
    }

    // == Is Expired ==
    /// Checks whether the deadline has passed at `now`.
    ///
    /// Boundary condition: an entry is expired only once `now` is strictly
    /// later than its deadline.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            Expiry::At(deadline) => now > *deadline,
            Expiry::Never => false,
        }
    }

    // == Remaining ==
    /// Returns the time left before expiry, or None if the entry never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has been reached.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self {
            Expiry::At(deadline) => Some(deadline.saturating_duration_since(now)),
            Expiry::Never => None,
        }
    }
}

// == Cache Entry ==
/// A single cache entry: the key it is indexed under, its value and deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// Key the entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// When the entry stops being served
    pub expiry: Expiry,
}

impl<K, V> CacheEntry<K, V> {
    pub fn new(key: K, value: V, expiry: Expiry) -> Self {
        Self { key, value, expiry }
    }

    /// Replaces value and deadline, keeping the key.
    pub fn refresh(&mut self, value: V, expiry: Expiry) {
        self.value = value;
        self.expiry = expiry;
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expiry.is_expired(now)
    }
}
