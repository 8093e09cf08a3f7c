use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::NewUser;
use crate::notifications::{LogNotifier, Notifier};
use crate::payments::{OfflineGateway, PaymentGateway};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub notifier: Arc<dyn Notifier>,
    pub gateway: Arc<dyn PaymentGateway>,
}

async fn try_cache_plugin(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_plugin(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = try_cache_plugin("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 数据库中没有任何用户时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });
    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = NewUser {
        username: "admin".to_string(),
        email,
        phone_number: None,
        password_hash,
        first_name: "Administrator".to_string(),
        last_name: String::new(),
        role: UserRole::Admin,
        status: UserStatus::Active,
        email_verified: true,
        phone_verified: true,
        trial_ends_at: None,
    };

    match storage.create_user(admin).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、通知与支付网关
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let config = AppConfig::get();
    if config.payment.key_secret.is_empty() && !config.payment.test_mode {
        warn!("payment.key_secret is empty: every payment signature will be rejected");
    }
    let gateway: Arc<dyn PaymentGateway> = Arc::new(OfflineGateway::from_config());
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::from_config());

    StartupContext {
        storage,
        cache,
        notifier,
        gateway,
    }
}
