//! Caching layer for bike provider responses.
//!
//! Requests planned around the same area hit the same stations over and
//! over, so successful legs are remembered for a while. Coordinates are
//! quantised to 1e-5 degrees (about a metre) to form the key; failures
//! are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::bike::{BikeLeg, BikeRouter, ProviderError};
use crate::network::Coord;

/// Cache key: (from lat, from lon, to lat, to lon) in 1e-5 degree units.
type LegKey = (i32, i32, i32, i32);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct BikeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for BikeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

fn quantise(value: f64) -> i32 {
    (value * 1e5).round() as i32
}

fn leg_key(from: Coord, to: Coord) -> LegKey {
    (
        quantise(from.lat),
        quantise(from.lon),
        quantise(to.lat),
        quantise(to.lon),
    )
}

/// Bike router with caching.
///
/// Wraps any [`BikeRouter`] and is one itself, so callers cannot tell the
/// difference.
pub struct CachedBikeRouter<P> {
    inner: P,
    legs: MokaCache<LegKey, Arc<BikeLeg>>,
}

impl<P> CachedBikeRouter<P> {
    /// Create a new cached router.
    pub fn new(inner: P, config: &BikeCacheConfig) -> Self {
        let legs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, legs }
    }
}

impl<P: BikeRouter> BikeRouter for CachedBikeRouter<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn cached_legs(&self) -> Option<u64> {
        Some(self.legs.entry_count())
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        let key = leg_key(from, to);

        if let Some(cached) = self.legs.get(&key).await {
            return Ok((*cached).clone());
        }

        let leg = self.inner.route(from, to).await?;
        self.legs.insert(key, Arc::new(leg.clone())).await;

        Ok(leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration as ChronoDuration;

    /// Counts calls; fails whenever the destination latitude is negative.
    struct CountingRouter {
        calls: AtomicUsize,
    }

    impl BikeRouter for CountingRouter {
        fn name(&self) -> &str {
            "counting"
        }

        async fn route(&self, _from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if to.lat < 0.0 {
                return Err(ProviderError::NoRoute);
            }
            Ok(BikeLeg {
                duration: ChronoDuration::minutes(5),
                distance_km: 1.0,
                geometry: vec![],
            })
        }
    }

    fn router() -> CachedBikeRouter<CountingRouter> {
        CachedBikeRouter::new(
            CountingRouter {
                calls: AtomicUsize::new(0),
            },
            &BikeCacheConfig::default(),
        )
    }

    #[test]
    fn default_config() {
        let config = BikeCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn nearby_coordinates_share_a_key() {
        let a = Coord::new(51.500001, -0.100001);
        let b = Coord::new(51.500002, -0.100002);
        let c = Coord::new(51.50002, -0.1);
        let to = Coord::new(51.51, -0.1);
        assert_eq!(leg_key(a, to), leg_key(b, to));
        assert_ne!(leg_key(a, to), leg_key(c, to));
        assert_ne!(leg_key(a, to), leg_key(to, a));
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cached = router();
        let from = Coord::new(51.5, -0.1);
        let to = Coord::new(51.51, -0.1);

        let first = cached.route(from, to).await.unwrap();
        let second = cached.route(from, to).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.name(), "counting");

        cached.legs.run_pending_tasks().await;
        assert_eq!(cached.cached_legs(), Some(1));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = router();
        let from = Coord::new(51.5, -0.1);
        let to = Coord::new(-1.0, -0.1);

        assert!(cached.route(from, to).await.is_err());
        assert!(cached.route(from, to).await.is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);

        cached.legs.run_pending_tasks().await;
        assert_eq!(cached.cached_legs(), Some(0));
    }
}
