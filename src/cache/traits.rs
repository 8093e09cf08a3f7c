use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn found(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// `ttl` 为 0 时使用后端默认过期时间
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}
