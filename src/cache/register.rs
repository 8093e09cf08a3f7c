use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

use once_cell::sync::Lazy;

use crate::cache::traits::ObjectCache;
use crate::errors::Result;

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

/// 已注册的缓存插件名称（排序后）
pub fn registered_object_cache_plugins() -> Vec<String> {
    let mut names: Vec<String> = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .keys()
        .cloned()
        .collect();
    names.sort();
    names
}

pub fn debug_object_cache_registry() {
    let names = registered_object_cache_plugins();
    if names.is_empty() {
        tracing::debug!("No object cache plugins registered.");
    } else {
        tracing::debug!("Registered object cache plugins: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plugins_registered() {
        let names = registered_object_cache_plugins();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
