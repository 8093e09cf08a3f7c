use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{
    CourseQuery, CreateCoursePricingRequest, CreateCourseRequest, UpdateCourseRequest,
    UpdateEnrollmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeCourseIdI64, SafeSubscriptionIdI64};

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// HTTP处理程序
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(course_data.into_inner(), &req).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn create_pricing(
    req: HttpRequest,
    pricing_data: web::Json<CreateCoursePricingRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_pricing(pricing_data.into_inner(), &req).await
}

pub async fn my_courses(request: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.my_courses(&request).await
}

pub async fn student_counts(request: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.student_counts(&request).await
}

pub async fn update_enrollment(
    req: HttpRequest,
    subscription_id: SafeSubscriptionIdI64,
    enrollment_data: web::Json<UpdateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_enrollment(subscription_id.0, enrollment_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 所有登录用户可访问，业务层按角色过滤
                    .route(web::get().to(list_courses))
                    .route(
                        web::post()
                            .to(create_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/my")
                    .route(web::get().to(my_courses))
                    .wrap(middlewares::RequireRole::new_any(
                        UserRole::learner_and_teacher_roles(),
                    )),
            )
            .service(
                web::resource("/student-count")
                    .route(web::get().to(student_counts))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/pricing")
                    .route(web::post().to(create_pricing))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/enrollment/{subscription_id}")
                    .route(web::patch().to(update_enrollment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_course))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
