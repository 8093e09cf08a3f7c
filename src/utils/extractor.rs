//! 安全的路径参数提取器
//!
//! 解析失败时返回统一的 `ApiResponse` 错误，而不是 actix 默认的纯文本 404。

/// 定义一个从路径参数解析正整数 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|id| *id > 0);

                futures_util::future::ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => {
                        let response = actix_web::HttpResponse::BadRequest().json(
                            $crate::models::ApiResponse::error_empty(
                                $crate::models::ErrorCode::BadRequest,
                                concat!("Invalid path parameter: ", $param),
                            ),
                        );
                        Err(actix_web::error::InternalError::from_response(
                            concat!("invalid ", $param),
                            response,
                        )
                        .into())
                    }
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeCourseIdI64, "id");
define_safe_i64_extractor!(SafeSubscriptionIdI64, "subscription_id");
