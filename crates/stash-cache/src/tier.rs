//! Primary cache tier implementations.
//!
//! The tier holds serialized records as strings behind the narrow
//! get/set/remove capability. Two implementations exist: an in-process
//! moka cache for single-instance deployments and a Redis-backed cache
//! shared across instances. The caller picks one at startup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use redis::AsyncCommands;
use tracing::debug;

use crate::error::CacheError;

/// String-keyed, string-valued cache capability with a fixed TTL.
///
/// Implementations must be cheap to share; faults surface as
/// `CacheError` and are swallowed by the caller.
#[async_trait]
pub trait CacheTier: Send + Sync {
    /// Fetches the cached string for `key`, or `None` on a miss.
    async fn get_string(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` with the tier's configured TTL.
    async fn set_string(&self, key: &str, value: String) -> Result<(), CacheError>;

    /// Removes `key` from the tier, if present.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Tier name for logging.
    fn tier_name(&self) -> &'static str;
}

/// Type alias for a shareable cache tier.
pub type DynCacheTier = Arc<dyn CacheTier>;

/// In-process primary cache built on moka with a cache-wide TTL.
pub struct MemoryCache {
    inner: Cache<String, String>,
}

impl MemoryCache {
    /// Creates a memory cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }
}

#[async_trait]
impl CacheTier for MemoryCache {
    async fn get_string(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.inner.get(key).await)
    }

    async fn set_string(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.inner.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    fn tier_name(&self) -> &'static str {
        "memory"
    }
}

/// Distributed primary cache backed by Redis.
///
/// Uses a connection manager so transient connection loss heals without
/// rebuilding the cache.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    ttl: Duration,
}

impl RedisCache {
    /// Connects to Redis at `url`; entries expire after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Redis` when the URL is invalid or the initial
    /// connection cannot be established.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        debug!(url, "connected distributed cache");
        Ok(Self { conn, ttl })
    }
}

#[async_trait]
impl CacheTier for RedisCache {
    async fn get_string(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set_string(&self, key: &str, value: String) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, self.ttl.as_secs())
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    fn tier_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that CacheTier is object-safe
    fn _assert_tier_object_safe(_: &dyn CacheTier) {}

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new(Duration::from_secs(60), 100);

        assert!(cache.get_string("item:1").await.unwrap().is_none());

        cache
            .set_string("item:1", "{\"id\":1}".to_string())
            .await
            .unwrap();
        assert_eq!(
            cache.get_string("item:1").await.unwrap().as_deref(),
            Some("{\"id\":1}")
        );

        cache.remove("item:1").await.unwrap();
        assert!(cache.get_string("item:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_ttl_expiry() {
        let cache = MemoryCache::new(Duration::from_millis(50), 100);
        cache
            .set_string("item:1", "v".to_string())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get_string("item:1").await.unwrap().is_none());
    }
}
