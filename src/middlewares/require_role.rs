/*!
 * 角色访问控制中间件
 *
 * 必须放在 RequireJWT 之后：
 *
 * ```rust,ignore
 * web::scope("/teachers")
 *     .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use super::create_error_response;
use crate::middlewares::RequireJWT;
use crate::models::{ErrorCode, users::entities::UserRole};

#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: vec![*role],
        }
    }

    /// 任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| **r).collect(),
        }
    }

    pub fn permits(&self, role: UserRole) -> bool {
        self.allowed.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            let Some(role) = RequireJWT::extract_user_role(req.request()) else {
                info!("Role check without an authenticated user on {}", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication credentials were not provided.",
                    )
                    .map_into_right_body(),
                ));
            };

            if policy.permits(role) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "Access denied for role {} on {} (allowed: {:?})",
                role,
                req.path(),
                policy.allowed
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "You do not have permission to perform this action.",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_policy() {
        let admin_only = RequireRole::new_any(UserRole::admin_roles());
        assert!(admin_only.permits(UserRole::Admin));
        assert!(!admin_only.permits(UserRole::Teacher));

        let learners = RequireRole::new_any(UserRole::learner_and_teacher_roles());
        assert!(learners.permits(UserRole::Student));
        assert!(learners.permits(UserRole::Teacher));
        assert!(!learners.permits(UserRole::Admin));

        assert!(RequireRole::new(&UserRole::Student).permits(UserRole::Student));
    }
}
