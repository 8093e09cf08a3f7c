use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use crate::cache::{self, ObjectCache};
use crate::errors::PlatformError;
use crate::middlewares::require_jwt::extract_bearer_token;
use crate::models::auth::responses::RefreshTokenResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, shared};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn expired_session() -> HttpResponse {
    let mut response = error_response(
        StatusCode::UNAUTHORIZED,
        ErrorCode::Unauthorized,
        "Login expired or invalid, please login again",
    );
    // 同时清除无效的 refresh token cookie
    let _ = response.add_cookie(&JwtUtils::create_empty_refresh_token_cookie());
    response
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Authentication credentials were not provided.",
        ));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_session());
        }
    };

    // 账号被删除或停用后不再续签
    let user = match claims.user_id() {
        Some(id) => storage.get_user_by_id(id).await?,
        None => None,
    };
    let Some(user) = user.filter(|u| u.is_active()) else {
        return Ok(expired_session());
    };

    let access_token = JwtUtils::generate_access_token(user.id, user.role.as_str())
        .map_err(|e| PlatformError::serialization(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: config.jwt.access_token_expiry * 60,
        },
        "Token refreshed successfully",
    )))
}

/// 清除 refresh token cookie 以及按 access token 缓存的用户
pub async fn handle_logout(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(token) = extract_bearer_token(request)
        && let Ok(cache) = shared::<dyn ObjectCache>(request, "Cache")
    {
        cache.remove(&cache::user_key(token)).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logout successful")))
}
