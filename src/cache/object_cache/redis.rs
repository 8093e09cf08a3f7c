use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    /// 秒
    ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        debug!(
            "RedisObjectCache created with prefix: '{}', TTL: {}s",
            redis_config.key_prefix, config.cache.default_ttl
        );

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        let mut conn = client.get_connection().map_err(|e| {
            error!("Failed to connect to Redis at {}: {}", redis_config.url, e);
            format!("Redis connection failed: {e}")
        })?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!("Redis connection test successful: {}", pong);

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return CacheResult::ExistsButNoValue;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(redis_key).await;

        match result {
            Ok(Some(data)) => {
                debug!("Successfully retrieved key: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let redis_key = self.make_key(&key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };

        match conn
            .set_ex::<String, String, ()>(redis_key, value, effective_ttl)
            .await
        {
            Ok(_) => {
                debug!(
                    "Successfully inserted key into cache: {} (TTL: {}s)",
                    key, effective_ttl
                );
            }
            Err(e) => {
                error!("Failed to insert key '{}' into cache: {}", key, e);
            }
        }
    }

    async fn remove(&self, key: &str) {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        match conn.del::<String, i32>(redis_key).await {
            Ok(deleted) => debug!("Removed cache key {} ({} deleted)", key, deleted),
            Err(e) => {
                error!("Failed to remove key '{}': {}", key, e);
            }
        }
    }

    async fn invalidate_all(&self) {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list keys for '{}': {}", pattern, e);
                return;
            }
        };
        if keys.is_empty() {
            return;
        }
        if let Err(e) = conn.del::<_, i64>(keys).await {
            warn!("Failed to invalidate cache keys: {}", e);
        }
    }
}
