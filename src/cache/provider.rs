//! Cache Provider Port
//!
//! The memoization capability injected into the handlers. Values live in
//! named regions so a whole region can be invalidated at once.

use std::future::Future;

use async_trait::async_trait;

use crate::cache::CacheStats;

/// Key-value memoization with whole-region invalidation.
///
/// Implementations own their thread-safety; callers share them behind an
/// `Arc<dyn CacheProvider<V>>`.
#[async_trait]
pub trait CacheProvider<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Returns the cached value for `key` in `region`, if present and fresh.
    async fn get(&self, region: &str, key: &str) -> Option<V>;

    /// Stores `value` under `key` in `region`, replacing any previous value.
    async fn put(&self, region: &str, key: &str, value: V);

    /// Stores `value` only if `region` has not been evicted since
    /// `generation` was read. Returns whether the value was stored.
    async fn put_if_generation(&self, region: &str, key: &str, value: V, generation: u64) -> bool;

    /// Returns the eviction counter of `region`.
    async fn generation(&self, region: &str) -> u64;

    /// Drops every entry in `region` and advances its generation.
    async fn evict_all(&self, region: &str);

    /// Returns a snapshot of the cache counters.
    async fn stats(&self) -> CacheStats;
}

/// Read-through lookup: answers from the cache when possible, otherwise runs
/// `producer` and caches its successful result.
///
/// Errors from `producer` are returned as-is and never cached. A result
/// computed while the region was evicted is returned but not cached, so a
/// snapshot taken before a write cannot outlive that write's eviction.
pub async fn get_or_compute<V, E, F, Fut>(
    cache: &dyn CacheProvider<V>,
    region: &str,
    key: &str,
    producer: F,
) -> Result<V, E>
where
    V: Clone + Send + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.get(region, key).await {
        return Ok(value);
    }

    let generation = cache.generation(region).await;
    let value = producer().await?;
    cache
        .put_if_generation(region, key, value.clone(), generation)
        .await;
    Ok(value)
}
