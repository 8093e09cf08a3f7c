use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
};
use crate::models::otp::requests::{SendOtpRequest, VerifyOtpRequest};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UpdateTeacherProfileRequest;
use crate::services::{AuthService, OtpService};

// 懒加载的全局 AuthService / OtpService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);
static OTP_SERVICE: Lazy<OtpService> = Lazy::new(OtpService::new_lazy);

pub async fn send_otp(
    req: HttpRequest,
    otp_data: web::Json<SendOtpRequest>,
) -> ActixResult<HttpResponse> {
    OTP_SERVICE.send(otp_data.into_inner(), &req).await
}

pub async fn verify_otp(
    req: HttpRequest,
    otp_data: web::Json<VerifyOtpRequest>,
) -> ActixResult<HttpResponse> {
    OTP_SERVICE.verify(otp_data.into_inner(), &req).await
}

pub async fn register(
    req: HttpRequest,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(user_data.into_inner(), &req).await
}

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn forgot_password(
    req: HttpRequest,
    reset_data: web::Json<ForgotPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.forgot_password(reset_data.into_inner(), &req).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

pub async fn update_teacher_profile(
    req: HttpRequest,
    profile_data: web::Json<UpdateTeacherProfileRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .update_teacher_profile(profile_data.into_inner(), &req)
        .await
}

pub async fn change_password(
    req: HttpRequest,
    password_data: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .change_password(password_data.into_inner(), &req)
        .await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            // 公开接口，按 IP 限流
            .service(
                web::resource("/otp/send")
                    .wrap(middlewares::RateLimit::otp())
                    .route(web::post().to(send_otp)),
            )
            .service(
                web::resource("/otp/verify")
                    .wrap(middlewares::RateLimit::otp())
                    .route(web::post().to(verify_otp)),
            )
            .service(
                web::resource("/register")
                    .wrap(middlewares::RateLimit::register())
                    .route(web::post().to(register)),
            )
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(middlewares::RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(
                web::resource("/forgot-password")
                    .wrap(middlewares::RateLimit::forgot_password())
                    .route(web::post().to(forgot_password)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(me))
                    .service(
                        web::resource("/me/teacher-profile").route(
                            web::put()
                                .to(update_teacher_profile)
                                .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                        ),
                    )
                    .route("/change-password", web::post().to(change_password))
                    .route("/logout", web::post().to(logout)),
            ),
    );
}
