use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use ts_rs::TS;

use crate::errors::PlatformError;
use crate::models::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "api.ts")]
pub enum MessageType {
    Success,
    Error,
}

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            message_type: MessageType::Success,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            message_type: MessageType::Error,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            message_type: MessageType::Success,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            message_type: MessageType::Error,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 业务错误直接作为 HTTP 响应返回，内部错误不向客户端暴露细节
impl ResponseError for PlatformError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("{} {}", self.code(), self.format_simple());
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };
        HttpResponse::build(self.status())
            .json(ApiResponse::error_empty(ErrorCode::from(self), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(3_i32, "ok")).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message_type"], "success");
        assert_eq!(json["data"], 3);
    }

    #[test]
    fn test_empty_error_omits_data() {
        let json = serde_json::to_value(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Course not found or inactive.",
        ))
        .unwrap();
        assert_eq!(json["code"], ErrorCode::NotFound as i32);
        assert_eq!(json["message_type"], "error");
        assert!(json.get("data").is_none());
    }

    #[actix_web::test]
    async fn test_platform_error_response() {
        let resp = PlatformError::conflict("Email is already in use.").error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = PlatformError::database_operation("constraint failed").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
