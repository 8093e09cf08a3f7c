//! 统一错误处理模块
//!
//! 错误类型由宏生成，每个变体带有错误代码、类型名称和详情。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 生成 enum 定义、`code()`、`error_type()`、`message()`、`status()`
/// 以及 snake_case 便捷构造函数。
macro_rules! define_platform_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum PlatformError {
            $($variant(String),)*
        }

        impl PlatformError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PlatformError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PlatformError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PlatformError::$variant(msg) => msg,)*
                }
            }

            /// 对应的 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(PlatformError::$variant(_) => StatusCode::$status,)*
                }
            }
        }

        paste::paste! {
            impl PlatformError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PlatformError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_platform_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Io("E006", "IO Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    Conflict("E010", "Conflict", CONFLICT),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    RateLimited("E014", "Rate Limited", TOO_MANY_REQUESTS),
    Payment("E015", "Payment Gateway Error", BAD_GATEWAY),
    Notification("E016", "Notification Delivery Error", INTERNAL_SERVER_ERROR),
}

impl PlatformError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为服务端内部错误
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PlatformError {}

impl From<sea_orm::DbErr> for PlatformError {
    fn from(err: sea_orm::DbErr) -> Self {
        PlatformError::DatabaseOperation(err.to_string())
    }
}

impl From<sea_orm::TransactionError<PlatformError>> for PlatformError {
    fn from(err: sea_orm::TransactionError<PlatformError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => e.into(),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        PlatformError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        PlatformError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PlatformError {
    fn from(err: chrono::ParseError) -> Self {
        PlatformError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
