//! In-Memory Cache Module
//!
//! Process-local `CacheProvider` backed by nested HashMaps with optional TTL
//! expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheProvider, CacheStats};

type Region<V> = HashMap<String, CacheEntry<V>>;

// == Cache State ==
#[derive(Debug)]
struct CacheState<V> {
    /// Region name -> key -> entry
    regions: HashMap<String, Region<V>>,
    /// Region name -> number of evictions so far
    generations: HashMap<String, u64>,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> CacheState<V> {
    fn entry_count(&self) -> usize {
        self.regions.values().map(HashMap::len).sum()
    }

    fn generation(&self, region: &str) -> u64 {
        self.generations.get(region).copied().unwrap_or_default()
    }

    fn insert(&mut self, region: &str, key: &str, entry: CacheEntry<V>) {
        self.regions
            .entry(region.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        self.refresh_entry_count();
    }

    fn refresh_entry_count(&mut self) {
        let count = self.entry_count();
        self.stats.set_total_entries(count);
    }
}

// == In-Memory Cache ==
/// Thread-safe in-memory cache with named regions.
#[derive(Debug)]
pub struct InMemoryCache<V> {
    state: RwLock<CacheState<V>>,
    /// TTL applied to every new entry, None = entries never expire
    ttl: Option<u64>,
}

impl<V> InMemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `ttl_seconds` - Lifetime of each entry in seconds; 0 disables expiry
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            state: RwLock::new(CacheState {
                regions: HashMap::new(),
                generations: HashMap::new(),
                stats: CacheStats::new(),
            }),
            ttl: (ttl_seconds > 0).then_some(ttl_seconds),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from every region.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut state = self.state.write().await;
        let before = state.entry_count();

        for region in state.regions.values_mut() {
            region.retain(|_, entry| !entry.is_expired());
        }
        state.regions.retain(|_, region| !region.is_empty());
        state.refresh_entry_count();

        before - state.stats.total_entries
    }

    // == Length ==
    /// Returns the current number of entries across all regions.
    pub async fn len(&self) -> usize {
        self.state.read().await.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<V> CacheProvider<V> for InMemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, region: &str, key: &str) -> Option<V> {
        // Write lock: a lookup updates stats and may drop an expired entry
        let mut state = self.state.write().await;

        let lookup = state
            .regions
            .get(region)
            .and_then(|entries| entries.get(key))
            .map(|entry| (entry.is_expired(), entry.value.clone()));

        match lookup {
            Some((false, value)) => {
                state.stats.record_hit();
                Some(value)
            }
            Some((true, _)) => {
                if let Some(entries) = state.regions.get_mut(region) {
                    entries.remove(key);
                }
                state.refresh_entry_count();
                state.stats.record_miss();
                None
            }
            None => {
                state.stats.record_miss();
                None
            }
        }
    }

    async fn put(&self, region: &str, key: &str, value: V) {
        let mut state = self.state.write().await;
        state.insert(region, key, CacheEntry::new(value, self.ttl));
    }

    async fn put_if_generation(&self, region: &str, key: &str, value: V, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation(region) != generation {
            return false;
        }
        state.insert(region, key, CacheEntry::new(value, self.ttl));
        true
    }

    async fn generation(&self, region: &str) -> u64 {
        self.state.read().await.generation(region)
    }

    async fn evict_all(&self, region: &str) {
        let mut state = self.state.write().await;
        state.regions.remove(region);
        *state.generations.entry(region.to_string()).or_default() += 1;
        state.stats.record_invalidation();
        state.refresh_entry_count();
    }

    async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entry_count());
        stats
    }
}
