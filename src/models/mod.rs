//! 数据模型
//!
//! `entities` 为业务实体，`requests` / `responses` 为 HTTP 层的输入输出结构。

pub mod auth;
pub mod common;
pub mod courses;
pub mod otp;
pub mod payments;
pub mod system;
pub mod teachers;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

use crate::errors::PlatformError;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，写入 `ApiResponse.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证 2xxx
    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,
    AccountDisabled = 2004,

    // 验证码 3xxx
    OtpInvalid = 3000,
    OtpExpired = 3001,
    OtpCooldown = 3002,

    // 课程与排课 4xxx
    CourseNotFound = 4000,
    ScheduleConflict = 4001,
    BatchUnavailable = 4002,

    // 支付 5xxx
    PaymentFailed = 5000,
    PaymentSignatureInvalid = 5001,
    SubscriptionNotFound = 5002,
}

impl From<&PlatformError> for ErrorCode {
    fn from(err: &PlatformError) -> Self {
        match err {
            PlatformError::Validation(_) | PlatformError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            PlatformError::NotFound(_) => ErrorCode::NotFound,
            PlatformError::Conflict(_) => ErrorCode::Conflict,
            PlatformError::Authentication(_) => ErrorCode::AuthFailed,
            PlatformError::Authorization(_) => ErrorCode::Forbidden,
            PlatformError::RateLimited(_) => ErrorCode::RateLimitExceeded,
            PlatformError::Payment(_) => ErrorCode::PaymentFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}
