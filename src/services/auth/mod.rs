pub mod login;
pub mod password;
pub mod profile;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::requests::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
};
use crate::models::users::requests::UpdateTeacherProfileRequest;
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 学生注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_logout(self, request).await
    }

    // 当前用户及角色资料
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_me(self, request).await
    }

    // 教师更新自己的资料
    pub async fn update_teacher_profile(
        &self,
        update_request: UpdateTeacherProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_update_teacher_profile(self, update_request, request).await
    }

    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, change_request, request).await
    }

    pub async fn forgot_password(
        &self,
        forgot_request: ForgotPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_forgot_password(self, forgot_request, request).await
    }
}
