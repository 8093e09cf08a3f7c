use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::Utc;

use crate::errors::PlatformError;
use crate::models::auth::requests::{ChangePasswordRequest, ForgotPasswordRequest};
use crate::models::otp::entities::{OtpLookup, OtpPurpose};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};
use crate::utils::IdentifierKind;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let current = current_user(request)?;

    if change_request.old_password.is_empty() {
        return Err(PlatformError::validation("Old password cannot be empty.").into());
    }

    // 请求扩展里的用户不带密码哈希，需要回源
    let user = storage
        .get_user_by_id(current.id)
        .await?
        .ok_or_else(|| PlatformError::not_found("User not found."))?;

    if !verify_password(&change_request.old_password, &user.password_hash) {
        return Err(PlatformError::validation("Old password is incorrect.").into());
    }
    if change_request.new_password.is_empty() {
        return Err(PlatformError::validation("New password cannot be empty.").into());
    }
    validate_password(&change_request.new_password).map_err(PlatformError::validation)?;
    if change_request.confirm_password.is_empty() {
        return Err(PlatformError::validation("Confirm password cannot be empty.").into());
    }
    if change_request.new_password != change_request.confirm_password {
        return Err(PlatformError::validation("New passwords do not match.").into());
    }

    let password_hash = hash_password(&change_request.new_password)?;
    storage.update_user_password(user.id, &password_hash).await?;
    tracing::info!("User {} changed password", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully.")))
}

pub async fn handle_forgot_password(
    service: &AuthService,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if forgot_request.new_password != forgot_request.confirm_password {
        return Err(PlatformError::validation("Passwords do not match.").into());
    }
    validate_password(&forgot_request.new_password).map_err(PlatformError::validation)?;

    let identifier = forgot_request.identifier.trim();
    let channel = if identifier.contains('@') {
        IdentifierKind::Email
    } else {
        IdentifierKind::Phone
    };

    let user = match channel {
        IdentifierKind::Email => storage.get_user_by_email(identifier).await?,
        IdentifierKind::Phone => storage.get_user_by_phone(identifier).await?,
    }
    .ok_or_else(|| PlatformError::validation("No user found with this identifier."))?;

    let otp = storage
        .find_latest_otp(OtpLookup {
            identifier,
            channel,
            purpose: OtpPurpose::PasswordReset,
            code: Some(forgot_request.otp_code.trim()),
            verified_only: false,
        })
        .await?;
    let Some(otp) = otp else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::OtpInvalid,
            "Invalid OTP.",
        ));
    };
    if otp.is_expired(Utc::now()) {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::OtpExpired,
            "OTP has expired.",
        ));
    }

    let password_hash = hash_password(&forgot_request.new_password)?;
    storage.update_user_password(user.id, &password_hash).await?;
    storage
        .delete_otps(identifier, OtpPurpose::PasswordReset)
        .await?;
    tracing::info!("Password reset for user {}", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password reset successfully.")))
}
