pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

/// 中间件统一的错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    if status == StatusCode::NO_CONTENT {
        return HttpResponse::build(status).finish();
    }
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}
