use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::PlatformError;
use crate::models::ApiResponse;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::{CreateAdminRequest, NewUser};
use crate::models::users::responses::UserResponse;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password, validate_phone, validate_username,
};

pub async fn handle_create_admin(
    service: &UserService,
    create_request: CreateAdminRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let username = create_request.username.trim();
    if username.is_empty() {
        return Err(
            PlatformError::validation("Username is required and cannot be blank.").into(),
        );
    }
    validate_username(username).map_err(PlatformError::validation)?;

    let email = create_request.email.trim();
    if email.is_empty() {
        return Err(PlatformError::validation("Email is required and cannot be blank.").into());
    }
    validate_email(email).map_err(PlatformError::validation)?;
    if storage.get_user_by_email(email).await?.is_some() {
        return Err(PlatformError::conflict("This email is already registered.").into());
    }
    if storage.get_user_by_username(username).await?.is_some() {
        return Err(PlatformError::conflict("A user with that username already exists.").into());
    }

    // 手机号可选，提供时校验格式与唯一性
    let phone = create_request
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if let Some(phone) = phone {
        validate_phone(phone).map_err(PlatformError::validation)?;
        if storage.get_user_by_phone(phone).await?.is_some() {
            return Err(
                PlatformError::conflict("This phone number is already registered.").into(),
            );
        }
    }

    validate_password(&create_request.password).map_err(PlatformError::validation)?;
    if create_request.password != create_request.confirm_password {
        return Err(PlatformError::validation("Passwords do not match.").into());
    }

    let admin = storage
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            phone_number: phone.map(str::to_string),
            password_hash: hash_password(&create_request.password)?,
            first_name: create_request.first_name.unwrap_or_default().trim().to_string(),
            last_name: create_request.last_name.unwrap_or_default().trim().to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            email_verified: true,
            phone_verified: true,
            trial_ends_at: None,
        })
        .await?;

    info!("Admin {} created", admin.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse::new(admin, None),
        "Admin created successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{TestApp, body_json, status_of};
    use actix_web::http::StatusCode;

    fn admin_request(username: &str, phone: Option<&str>) -> CreateAdminRequest {
        CreateAdminRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            phone_number: phone.map(str::to_string),
            password: "password123".into(),
            confirm_password: "password123".into(),
            first_name: Some(" Meera ".into()),
            last_name: None,
        }
    }

    #[actix_web::test]
    async fn test_create_admin() {
        let app = TestApp::new().await;
        let root = app.user("root", "9000000091", UserRole::Admin).await;
        let req = app.request(Some(&root));
        let service = UserService::new_lazy();

        // 手机号可省略
        let created = service.create_admin(admin_request("meera", None), &req).await;
        assert_eq!(status_of(&created), StatusCode::CREATED);
        let body = body_json(created).await;
        assert_eq!(body["data"]["role"], "admin");
        assert_eq!(body["data"]["first_name"], "Meera");

        let stored = app.storage.get_user_by_username("meera").await.unwrap().unwrap();
        assert_eq!(stored.phone_number, None);
        assert!(stored.email_verified && stored.phone_verified);

        let blank_phone = service
            .create_admin(admin_request("kiran", Some("  ")), &req)
            .await;
        assert_eq!(status_of(&blank_phone), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_create_admin_rejections() {
        let app = TestApp::new().await;
        let root = app.user("root", "9000000092", UserRole::Admin).await;
        let req = app.request(Some(&root));
        let service = UserService::new_lazy();

        let mut same_email = admin_request("other", None);
        same_email.email = "root@example.com".into();
        let same_email = service.create_admin(same_email, &req).await;
        assert_eq!(status_of(&same_email), StatusCode::CONFLICT);
        assert_eq!(
            body_json(same_email).await["message"],
            "This email is already registered."
        );

        let same_phone = service
            .create_admin(admin_request("other", Some("9000000092")), &req)
            .await;
        assert_eq!(status_of(&same_phone), StatusCode::CONFLICT);
        assert_eq!(
            body_json(same_phone).await["message"],
            "This phone number is already registered."
        );

        let bad_phone = service
            .create_admin(admin_request("other", Some("12-34")), &req)
            .await;
        assert_eq!(status_of(&bad_phone), StatusCode::BAD_REQUEST);

        let mut mismatch = admin_request("other", None);
        mismatch.confirm_password = "password124".into();
        let mismatch = service.create_admin(mismatch, &req).await;
        assert_eq!(body_json(mismatch).await["message"], "Passwords do not match.");

        assert!(app.storage.get_user_by_username("other").await.unwrap().is_none());
    }
}
