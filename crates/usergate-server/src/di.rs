//! Dependency injection module using Shaku.

use shaku::{module, HasComponent};
use std::sync::Arc;
use usergate_config::{RedisConfig, ServiceConfig};
use usergate_core::UsergateResult;
use usergate_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlUserRepository,
};
use usergate_security::{PasswordHasher, PasswordHasherParameters};
use usergate_service::{
    create_redis_pool, RedisCacheService, RedisCacheServiceParameters, UserService,
    UserServiceImpl, UserServiceImplParameters,
};

module! {
    pub UsergateModule {
        components = [
            DatabasePool,
            MySqlUserRepository,
            PasswordHasher,
            RedisCacheService,
            UserServiceImpl,
        ],
        providers = [],
    }
}

impl UsergateModule {
    /// Resolves the user service.
    pub fn user_service(&self) -> Arc<dyn UserService> {
        self.resolve()
    }

    /// Resolves the database pool.
    pub fn database(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

/// Builds the module around a connected pool.
///
/// The Redis pool is created lazily; with `redis.enabled = false` the cache
/// component runs disabled.
pub fn build_module(
    database: &DatabasePool,
    redis_config: &RedisConfig,
    service_config: &ServiceConfig,
) -> UsergateResult<Arc<UsergateModule>> {
    let cache_pool = create_redis_pool(redis_config)?;
    let password_hasher = PasswordHasher::new();

    let module = UsergateModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: database.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
        })
        .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<UserServiceImpl>(UserServiceImplParameters {
            operation_timeout: service_config.operation_timeout(),
            cache_ttl: service_config.cache_ttl(),
        })
        .build();

    Ok(Arc::new(module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::mysql::MySqlPool;
    use usergate_service::CacheInterface;

    fn lazy_pool() -> DatabasePool {
        DatabasePool::with_pool(
            MySqlPool::connect_lazy("mysql://usergate@127.0.0.1:1/usergate").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_module_resolves_every_component() {
        let redis = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        let module = build_module(&lazy_pool(), &redis, &ServiceConfig::default()).unwrap();

        let _service = module.user_service();
        let _database = module.database();
        let cache: Arc<dyn CacheInterface> = module.resolve();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_module_with_redis_enabled_builds_lazily() {
        let redis = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            enabled: true,
            ..RedisConfig::default()
        };
        let module = build_module(&lazy_pool(), &redis, &ServiceConfig::default()).unwrap();

        let cache: Arc<dyn CacheInterface> = module.resolve();
        assert!(cache.is_enabled());
    }
}
