use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::Utc;
use tracing::{info, warn};

use crate::cache::{self, CacheResult, ObjectCache};
use crate::errors::PlatformError;
use crate::models::otp::entities::{NewOtp, OtpPurpose};
use crate::models::otp::requests::SendOtpRequest;
use crate::models::otp::responses::OtpSentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::notifications::{Notifier, templates};
use crate::services::{error_response, shared};
use crate::utils::random_code::generate_otp_code;
use crate::utils::{IdentifierKind, detect_identifier};

use super::OtpService;

pub async fn handle_send_otp(
    service: &OtpService,
    send_request: SendOtpRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let identifier = send_request.identifier.trim();
    let channel = detect_identifier(identifier, send_request.identifier_type)
        .map_err(PlatformError::validation)?;
    let purpose = send_request.purpose;

    // 1. 注册要求未被占用，找回密码要求账号存在
    let existing = match channel {
        IdentifierKind::Email => storage.get_user_by_email(identifier).await?,
        IdentifierKind::Phone => storage.get_user_by_phone(identifier).await?,
    };
    let rejection = match (purpose, channel, existing.is_some()) {
        (OtpPurpose::Registration, IdentifierKind::Email, true) => {
            Some("This email is already registered.")
        }
        (OtpPurpose::Registration, IdentifierKind::Phone, true) => {
            Some("This phone number is already registered.")
        }
        (OtpPurpose::PasswordReset, IdentifierKind::Email, false) => {
            Some("No user found with this email address.")
        }
        (OtpPurpose::PasswordReset, IdentifierKind::Phone, false) => {
            Some("No user found with this phone number.")
        }
        _ => None,
    };
    if let Some(message) = rejection {
        return Err(PlatformError::validation(message).into());
    }

    // 2. 重发冷却
    let cache = shared::<dyn ObjectCache>(request, "Cache").ok();
    let cooldown_key = cache::otp_cooldown_key(identifier, purpose.as_str());
    if let Some(cache) = &cache
        && matches!(cache.get_raw(&cooldown_key).await, CacheResult::Found(_))
    {
        return Ok(error_response(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::OtpCooldown,
            format!(
                "Please wait {} seconds before requesting another OTP.",
                config.otp.resend_cooldown_secs
            ),
        ));
    }

    // 3. 生成并保存
    let code = generate_otp_code();
    let expires_at = Utc::now() + chrono::Duration::minutes(config.otp.expiry_minutes);
    storage
        .create_otp(NewOtp {
            identifier: identifier.to_string(),
            channel,
            purpose,
            code: code.clone(),
            expires_at,
        })
        .await?;

    // 4. 投递
    let notifier = shared::<dyn Notifier>(request, "Notifier")?;
    let brand = &config.app.system_name;
    match channel {
        IdentifierKind::Email => {
            let message = templates::otp_email(
                brand,
                identifier,
                &code,
                purpose,
                config.otp.expiry_minutes,
            );
            notifier.send_email(message).await?;
        }
        IdentifierKind::Phone => {
            let text = templates::otp_sms(brand, &code, config.otp.expiry_minutes);
            notifier.send_sms(identifier, &text).await?;
        }
    }

    match &cache {
        Some(cache) if config.otp.resend_cooldown_secs > 0 => {
            cache
                .insert_raw(cooldown_key, "1".to_string(), config.otp.resend_cooldown_secs)
                .await;
        }
        Some(_) => {}
        None => warn!("Cache unavailable, OTP resend cooldown not enforced"),
    }

    info!("OTP for {} sent to {} {}", purpose.as_str(), channel, identifier);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OtpSentResponse {
            identifier: identifier.to_string(),
            identifier_type: channel,
            purpose,
            expires_at,
        },
        format!("OTP sent to your {}.", channel),
    )))
}
