use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateAdminRequest;
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn create_admin(
    req: HttpRequest,
    admin_data: web::Json<CreateAdminRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_admin(admin_data.into_inner(), &req).await
}

pub async fn list_students(request: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_students(&request).await
}

pub async fn list_students_not_enrolled(request: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_students_not_enrolled(&request).await
}

pub async fn status_counts(request: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.status_counts(&request).await
}

// 配置路由，全部仅管理员可用
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admins")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_admin)),
    )
    .service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_students))
            .route("/not-enrolled", web::get().to(list_students_not_enrolled)),
    )
    .service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/status-counts", web::get().to(status_counts)),
    );
}
