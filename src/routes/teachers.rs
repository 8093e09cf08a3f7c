use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::users::entities::UserRole;
use crate::services::{TeacherService, UserService};

static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn list_teachers(request: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_teachers(&request).await
}

pub async fn create_teacher(
    req: HttpRequest,
    teacher_data: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_teacher(teacher_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_teachers))
                    .route(web::post().to(create_teacher)),
            ),
    );
}
