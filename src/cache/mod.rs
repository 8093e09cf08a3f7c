//! 对象缓存
//!
//! 缓存后端通过 `declare_object_cache_plugin!` 在进程启动时注册到全局表，
//! 启动阶段按配置的 `cache.type` 取出构造函数创建实例。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 已认证用户缓存键
pub fn user_key(token: &str) -> String {
    format!("user:{token}")
}

/// 验证码重发冷却键
pub fn otp_cooldown_key(identifier: &str, purpose: &str) -> String {
    format!("otp_cooldown:{purpose}:{identifier}")
}

/// 声明并注册一个缓存插件
///
/// 类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                            .map_err($crate::errors::PlatformError::cache_connection)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(user_key("abc"), "user:abc");
        assert_eq!(
            otp_cooldown_key("a@b.com", "registration"),
            "otp_cooldown:registration:a@b.com"
        );
    }
}
