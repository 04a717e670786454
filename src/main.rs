//! TTL LRU Cache demo
//!
//! Walks two small caches through filling, expiry-driven eviction and
//! saturation, dumping their contents after each step.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::{Config, TtlLruCache};

/// Pause that lets the short-lived entries of the first scenario expire.
const EXPIRY_PAUSE: Duration = Duration::from_secs(3);

/// Main entry point for the cache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Fill a 4-slot cache with timed and already-expired entries, then add more
/// 4. Saturate a 2-slot cache with live entries and show the refused insert
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info,ttl_lru_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl={:?}",
        config.capacity, config.default_ttl
    );

    eviction_scenario(&config).await?;
    saturation_scenario()?;

    info!("Demo complete");
    Ok(())
}

/// A full cache makes room by evicting entries whose TTL has run out.
async fn eviction_scenario(config: &Config) -> anyhow::Result<()> {
    let cache = TtlLruCache::from_config(&Config {
        capacity: 4,
        ..config.clone()
    })?;

    cache.add_with_ttl("c", "ccc", Duration::from_secs(5))?;
    cache.add_with_ttl("d", "ddd", Duration::from_secs(1))?;
    cache.add_with_ttl("a", "aaa", Duration::ZERO)?;
    cache.add_with_ttl("b", "bbb", Duration::ZERO)?;
    dump("filled", &cache)?;

    // "a" and "b" are already past their deadline
    try_add(&cache, "g", "ggg");
    dump("after adding g", &cache)?;

    info!("Sleeping {:?}", EXPIRY_PAUSE);
    tokio::time::sleep(EXPIRY_PAUSE).await;

    try_add(&cache, "f", "fff");
    dump("after adding f", &cache)?;

    Ok(())
}

/// A full cache of live entries refuses new keys.
fn saturation_scenario() -> anyhow::Result<()> {
    let cache = TtlLruCache::new(2)?;
    cache.add_with_ttl("a", "aaa", Duration::from_secs(2))?;
    cache.add_with_ttl("b", "bbb", Duration::from_secs(2))?;
    dump("filled", &cache)?;

    try_add(&cache, "c", "ccc");
    dump("after adding c", &cache)?;

    info!("Stats: {}", serde_json::to_string(&cache.stats())?);
    Ok(())
}

fn try_add<K, V>(cache: &TtlLruCache<K, V>, key: K, value: V)
where
    K: Hash + Eq + Clone + Debug,
{
    let label = format!("{key:?}");
    match cache.add(key, value) {
        Ok(()) => info!("Added {}", label),
        Err(err) => warn!("Could not add {}: {}. Try later", label, err),
    }
}

fn dump<K, V>(stage: &str, cache: &TtlLruCache<K, V>) -> anyhow::Result<()>
where
    K: Hash + Eq + Clone + Serialize,
    V: Clone + Serialize,
{
    let snapshot = cache.snapshot();
    println!("-- {stage} ({}/{})", snapshot.len, snapshot.capacity);
    for entry in &snapshot.entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    println!();
    Ok(())
}
