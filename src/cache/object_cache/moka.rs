use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 按条目设置过期时间
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        if config.cache.memory.max_capacity == 0 {
            return Err("cache.memory.max_capacity must be greater than 0".to_string());
        }

        let inner = Cache::builder()
            .max_capacity(config.cache.memory.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            "MokaObjectCache initialized with max capacity: {}",
            config.cache.memory.max_capacity
        );
        Ok(Self {
            inner,
            default_ttl: Duration::from_secs(config.cache.default_ttl),
        })
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(entry.value)
            }
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
