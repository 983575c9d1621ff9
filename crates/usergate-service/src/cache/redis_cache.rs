//! Redis-based cache implementation.

use super::{CacheError, CacheInterface, CacheResult};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use usergate_config::RedisConfig;
use usergate_core::{UsergateError, UsergateResult};

/// TTL applied to every cached user (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Redis-based cache service. Without a pool every read misses and every
/// write is dropped.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> CacheResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| CacheError::Storage(format!("Failed to get Redis connection: {e}"))),
            None => Err(CacheError::Storage("Cache is disabled".to_string())),
        }
    }
}

/// Builds the Redis pool, or `None` when caching is disabled.
///
/// Connections are opened lazily, so an unreachable server only shows up
/// later as cache storage errors.
pub fn create_redis_pool(config: &RedisConfig) -> UsergateResult<Option<Arc<Pool>>> {
    if !config.enabled {
        info!("Redis cache disabled");
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size.max(1)));
    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| UsergateError::Cache(format!("Failed to create Redis pool: {e}")))?;

    info!(pool_size = config.pool_size, "Redis cache pool created");
    Ok(Some(Arc::new(pool)))
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Storage(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Storage(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::Storage(format!("Failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_misses_and_drops_writes() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());

        cache.set_raw("k", "v", DEFAULT_TTL).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        cache.delete("k").await.unwrap();
    }

    #[test]
    fn test_disabled_config_builds_no_pool() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        assert!(create_redis_pool(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enabled_config_builds_pool_lazily() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 4,
            enabled: true,
        };
        let pool = create_redis_pool(&config).unwrap().expect("pool expected");
        assert_eq!(pool.status().max_size, 4);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_storage_error() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 1,
            enabled: true,
        };
        let cache = RedisCacheService::new(create_redis_pool(&config).unwrap().unwrap());
        let err = cache.get_raw("k").await.unwrap_err();
        assert!(matches!(err, CacheError::Storage(_)));
    }
}
