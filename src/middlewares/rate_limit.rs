/*!
 * 速率限制中间件
 *
 * 以客户端 IP（已认证时为用户 ID）加端点前缀计数，窗口内超过上限返回 429。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::users::entities::User;

/// 前缀:标识 -> 窗口内请求数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    /// 秒
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 发送与校验验证码：5 次/分钟
    pub fn otp() -> Self {
        Self::new(5, 60).with_prefix("otp")
    }

    /// 找回密码：5 次/分钟
    pub fn forgot_password() -> Self {
        Self::new(5, 60).with_prefix("forgot_password")
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }
}

/// 客户端 IP，连接信息优先，其次 X-Forwarded-For / X-Real-IP
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    req.extensions().get::<User>().map(|user| user.id)
}

fn rate_limit_key(prefix: &str, identifier: &str) -> String {
    if prefix.is_empty() {
        identifier.to_string()
    } else {
        format!("{prefix}:{identifier}")
    }
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    let mut res = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "Request was throttled. Please try again later.",
    );
    let headers = res.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        headers.insert(RETRY_AFTER, value);
    }
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from_static("0"),
    );
    res
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = rate_limit_key(&key_prefix, &identifier);

            let current_count = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);

            if current_count >= max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, max_requests
                );
                return Ok(req
                    .into_response(create_rate_limit_response(window_secs).map_into_right_body()));
            }

            RATE_LIMIT_CACHE
                .insert(cache_key.clone(), current_count + 1)
                .await;

            let remaining = max_requests.saturating_sub(current_count + 1);
            req.extensions_mut().insert(RateLimitInfo {
                remaining,
                limit: max_requests,
                reset: window_secs,
            });

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 本次请求后的配额
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::otp().key_prefix, "otp");
        assert_eq!(RateLimit::refresh_token().max_requests, 10);
    }

    #[test]
    fn test_rate_limit_key() {
        assert_eq!(rate_limit_key("otp", "ip:1.2.3.4"), "otp:ip:1.2.3.4");
        assert_eq!(rate_limit_key("", "user:7"), "user:7");
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }

    #[actix_web::test]
    async fn test_throttled_response() {
        let res = create_rate_limit_response(60);
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get(RETRY_AFTER).unwrap(), "60");
    }
}
