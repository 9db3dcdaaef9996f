//! Caching layer for proximity queries.
//!
//! The mobile app re-plans from the same pinned origin and destination many
//! times (changing one end, toggling transfers), so the same proximity
//! lookups recur. We cache `find_routes_near` results keyed by the exact
//! coordinate and threshold; every other query goes straight to the store.
//!
//! Route data is read-only while the server runs, so a TTL only bounds
//! memory, not staleness.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, Fraction, RouteInfo, RouteKey};
use crate::store::{GeometryStore, RouteContact, RouteProximityMatch, StoreError, Subline};

/// Cache key for proximity lookups: (latitude bits, longitude bits, threshold bits).
type ProximityKey = (u64, u64, u64);

/// Cached proximity result.
type ProximityEntry = Arc<Vec<RouteProximityMatch>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Cache for proximity lookups.
pub struct ProximityCache {
    entries: MokaCache<ProximityKey, ProximityEntry>,
}

impl ProximityCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Compute the cache key for a lookup.
    fn key(point: Coordinate, threshold_m: f64) -> ProximityKey {
        let (lat, lon) = point.bits();
        (lat, lon, threshold_m.to_bits())
    }

    /// Get a cached entry.
    pub async fn get(&self, point: Coordinate, threshold_m: f64) -> Option<ProximityEntry> {
        self.entries.get(&Self::key(point, threshold_m)).await
    }

    /// Insert an entry into the cache.
    pub async fn insert(&self, point: Coordinate, threshold_m: f64, entry: ProximityEntry) {
        self.entries
            .insert(Self::key(point, threshold_m), entry)
            .await;
    }
}

/// Geometry store with cached proximity lookups.
///
/// Wraps any `GeometryStore`; only successful lookups are cached, so a
/// failing store is retried on the next request.
pub struct CachedStore<S> {
    store: S,
    cache: ProximityCache,
}

impl<S: GeometryStore> CachedStore<S> {
    /// Create a new cached store.
    pub fn new(store: S, cache_config: &CacheConfig) -> Self {
        Self {
            store,
            cache: ProximityCache::new(cache_config),
        }
    }

    /// Access the underlying store for operations that bypass cache.
    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: GeometryStore> GeometryStore for CachedStore<S> {
    async fn find_routes_near(
        &self,
        point: Coordinate,
        threshold_m: f64,
    ) -> Result<Vec<RouteProximityMatch>, StoreError> {
        // Try cache first
        if let Some(cached) = self.cache.get(point, threshold_m).await {
            return Ok(cached.as_ref().clone());
        }

        let matches = self.store.find_routes_near(point, threshold_m).await?;
        self.cache
            .insert(point, threshold_m, Arc::new(matches.clone()))
            .await;

        Ok(matches)
    }

    async fn project_point(&self, route: RouteKey, point: Coordinate) -> Result<Fraction, StoreError> {
        self.store.project_point(route, point).await
    }

    async fn extract_subline(
        &self,
        route: RouteKey,
        start: Fraction,
        end: Fraction,
    ) -> Result<Subline, StoreError> {
        self.store.extract_subline(route, start, end).await
    }

    async fn closest_point_between(
        &self,
        from: RouteKey,
        sample: Fraction,
        to: RouteKey,
    ) -> Result<RouteContact, StoreError> {
        self.store.closest_point_between(from, sample, to).await
    }

    async fn routes(&self) -> Result<Vec<Arc<RouteInfo>>, StoreError> {
        self.store.routes().await
    }
}
