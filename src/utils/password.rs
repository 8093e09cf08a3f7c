use crate::config::AppConfig;
use crate::errors::PlatformError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 哈希密码（Argon2id，参数取自配置）
pub fn hash_password(password: &str) -> Result<String, PlatformError> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| PlatformError::validation(format!("Invalid Argon2 parameters: {e}")))?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PlatformError::validation(format!("Password hashing failed: {e}")))
}

/// 验证密码，哈希串自带参数
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
