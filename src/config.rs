//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL applied by `add`; `None` means entries added that way never expire
    pub default_ttl: Option<Duration>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: unset, no expiry)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            default_ttl: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .or(defaults.default_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: None,
        }
    }
}
