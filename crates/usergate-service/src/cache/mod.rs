//! Read-through cache for the service layer.
//!
//! Values are stored as JSON strings behind a dyn-compatible
//! [`CacheInterface`]; [`CacheExt`] adds typed access on top.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::{CacheError, CacheExt, CacheInterface, CacheResult};
pub use redis_cache::{create_redis_pool, RedisCacheService, RedisCacheServiceParameters, DEFAULT_TTL};
