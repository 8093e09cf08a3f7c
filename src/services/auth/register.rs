use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use crate::errors::{PlatformError, Result};
use crate::models::ApiResponse;
use crate::models::auth::requests::RegisterRequest;
use crate::models::otp::entities::{OtpLookup, OtpPurpose};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::IdentifierKind;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password, validate_phone, validate_username,
};

use super::AuthService;
use super::profile::user_response;

/// 注册要求邮箱和手机号各有一条已验证且未过期的注册验证码
async fn ensure_registration_otp(
    storage: &dyn Storage,
    identifier: &str,
    channel: IdentifierKind,
    message: &str,
) -> Result<()> {
    let otp = storage
        .find_latest_otp(OtpLookup {
            identifier,
            channel,
            purpose: OtpPurpose::Registration,
            code: None,
            verified_only: true,
        })
        .await?;
    match otp {
        Some(otp) if !otp.is_expired(Utc::now()) => Ok(()),
        _ => Err(PlatformError::validation(message)),
    }
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let username = register_request.username.trim();
    let email = register_request.email.trim();
    let phone = register_request.phone_number.trim();

    // 1. 字段格式
    validate_username(username).map_err(PlatformError::validation)?;
    validate_email(email).map_err(PlatformError::validation)?;
    validate_phone(phone).map_err(PlatformError::validation)?;
    validate_password(&register_request.password).map_err(PlatformError::validation)?;

    // 2. 唯一性
    if storage.get_user_by_username(username).await?.is_some() {
        return Err(PlatformError::conflict("A user with that username already exists.").into());
    }
    if storage.get_user_by_email(email).await?.is_some() {
        return Err(PlatformError::conflict("This email is already registered.").into());
    }
    if storage.get_user_by_phone(phone).await?.is_some() {
        return Err(PlatformError::conflict("This phone number is already registered.").into());
    }

    if register_request.password != register_request.confirm_password {
        return Err(PlatformError::validation("Passwords do not match.").into());
    }

    // 3. 验证码
    ensure_registration_otp(
        storage.as_ref(),
        email,
        IdentifierKind::Email,
        "Email OTP not verified or expired.",
    )
    .await?;
    ensure_registration_otp(
        storage.as_ref(),
        phone,
        IdentifierKind::Phone,
        "Phone OTP not verified or expired.",
    )
    .await?;

    // 4. 创建学生（事务内同时清理注册验证码）
    let now = Utc::now();
    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        phone_number: Some(phone.to_string()),
        password_hash: hash_password(&register_request.password)?,
        first_name: register_request
            .first_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        last_name: register_request
            .last_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        role: UserRole::Student,
        status: UserStatus::Active,
        email_verified: true,
        phone_verified: true,
        trial_ends_at: Some(now + chrono::Duration::days(config.student.trial_days)),
    };

    let user = storage.register_student(new_user).await?;
    tracing::info!("Student {} registered", user.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        user_response(storage.as_ref(), user).await?,
        "Registration successful",
    )))
}
