/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，通过后把当前用户放入请求扩展。
 * 用户信息按 token 缓存，缓存未命中时回源数据库并检查账号状态。
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses))
 * ```
 */

use std::{rc::Rc, sync::Arc};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use super::create_error_response;
use crate::cache::{self, CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 从请求头取出 bearer token
pub fn extract_bearer_token(req: &actix_web::HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<User, (ErrorCode, String)> {
    let unauthorized = |msg: &str| (ErrorCode::Unauthorized, msg.to_string());

    let token = extract_bearer_token(req.request())
        .ok_or_else(|| unauthorized("Authentication credentials were not provided."))?
        .to_string();

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("Access token rejected: {}", err);
        unauthorized("Given token not valid for any token type.")
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    let cache_key = cache::user_key(&token);
    if let Some(cache) = &cache {
        match cache.get_raw(&cache_key).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => return Ok(user),
                Err(_) => cache.remove(&cache_key).await,
            },
            _ => debug!("Cache miss for user token"),
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| (ErrorCode::InternalServerError, "Storage unavailable.".to_string()))?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| unauthorized("Token contained no recognizable user identification."))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| (ErrorCode::InternalServerError, e.to_string()))?
        .ok_or_else(|| unauthorized("User not found."))?;

    if !user.is_active() {
        return Err((ErrorCode::AccountDisabled, "User account is disabled.".to_string()));
    }

    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&user)
    {
        let ttl = AppConfig::get()
            .cache
            .default_ttl
            .min(AppConfig::get().jwt.access_token_expiry.max(1) as u64);
        cache.insert_raw(cache_key, json, ttl).await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("Authenticated user {} ({})", user.id, user.role);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err((code, message)) => {
                    info!("Authentication failed for {}: {}", req.path(), message);
                    let status = match code {
                        ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::AccountDisabled => StatusCode::FORBIDDEN,
                        _ => StatusCode::UNAUTHORIZED,
                    };
                    Ok(req.into_response(
                        create_error_response(status, code, &message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前用户，仅在 RequireJWT 之后可用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_bearer_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic xyz"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), None);
    }
}
