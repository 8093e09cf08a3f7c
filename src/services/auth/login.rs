use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{info, warn};

use crate::errors::PlatformError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::error_response;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;
use super::profile::user_response;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let identifier = login_request.identifier.trim();
    if identifier.is_empty() || login_request.password.is_empty() {
        return Err(
            PlatformError::validation("Must include \"identifier\" and \"password\".").into(),
        );
    }

    // 1. 邮箱、手机号或用户名
    let Some(user) = storage.find_user_by_login_identifier(identifier).await? else {
        return Err(PlatformError::validation(
            "Invalid identifier. Please provide a valid email, phone number, or username.",
        )
        .into());
    };

    // 2. 校验密码
    if !verify_password(&login_request.password, &user.password_hash) {
        warn!("Failed login attempt for user {}", user.username);
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Invalid credentials.",
        ));
    }

    if !user.is_active() {
        return Ok(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::AccountDisabled,
            "User account is disabled.",
        ));
    }

    // 3. 签发令牌
    let token_pair =
        JwtUtils::generate_token_pair(user.id, user.role.as_str(), login_request.remember_me)
            .map_err(|e| PlatformError::serialization(format!("Unable to generate token: {e}")))?;

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    info!("User {} logged in successfully", user.username);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        user: user_response(storage.as_ref(), user).await?,
    };
    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, login_request.remember_me);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::services::test_support::{TestApp, body_json, status_of};
    use crate::storage::sea_orm_storage::test_support::new_user;
    use crate::utils::password::hash_password;

    async fn member(app: &TestApp, username: &str, phone: &str, status: UserStatus) -> User {
        let email = format!("{username}@example.com");
        let mut user = new_user(username, &email, phone, UserRole::Student);
        user.password_hash = hash_password("password123").unwrap();
        user.status = status;
        app.storage.create_user(user).await.unwrap()
    }

    fn login(identifier: &str, password: &str) -> LoginRequest {
        LoginRequest {
            identifier: identifier.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    #[actix_web::test]
    async fn test_login_with_any_identifier() {
        let app = TestApp::new().await;
        let asha = member(&app, "asha", "9000000071", UserStatus::Active).await;
        let service = AuthService::new_lazy();

        for identifier in ["asha", "asha@example.com", "9000000071"] {
            let result = service.login(login(identifier, "password123"), &app.request(None)).await;
            assert_eq!(status_of(&result), StatusCode::OK);
            let response = result.unwrap();
            let cookie = response
                .cookies()
                .find(|c| c.name() == "refresh_token")
                .expect("refresh cookie");
            assert_eq!(cookie.http_only(), Some(true));
            assert!(!cookie.value().is_empty());

            let body = body_json(Ok(response)).await;
            assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());
            assert_eq!(body["data"]["user"]["username"], "asha");
        }

        let stored = app.storage.get_user_by_id(asha.id).await.unwrap().unwrap();
        assert!(stored.last_login.is_some());
    }

    #[actix_web::test]
    async fn test_login_failures() {
        let app = TestApp::new().await;
        member(&app, "asha", "9000000072", UserStatus::Active).await;
        member(&app, "dormant", "9000000073", UserStatus::Inactive).await;
        let service = AuthService::new_lazy();
        let req = app.request(None);

        let unknown = service.login(login("nobody", "password123"), &req).await;
        assert_eq!(status_of(&unknown), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(unknown).await["message"],
            "Invalid identifier. Please provide a valid email, phone number, or username."
        );

        let wrong = service.login(login("asha", "password999"), &req).await;
        assert_eq!(status_of(&wrong), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await["message"], "Invalid credentials.");

        let disabled = service.login(login("dormant", "password123"), &req).await;
        assert_eq!(status_of(&disabled), StatusCode::FORBIDDEN);
        assert_eq!(body_json(disabled).await["message"], "User account is disabled.");

        let blank = service.login(login("  ", ""), &req).await;
        assert_eq!(status_of(&blank), StatusCode::BAD_REQUEST);
    }
}
