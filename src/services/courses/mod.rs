pub mod enrollment;
pub mod list;
pub mod manage;
pub mod mine;
pub mod stats;
pub mod views;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::{
    CourseQuery, CreateCoursePricingRequest, CreateCourseRequest, UpdateCourseRequest,
    UpdateEnrollmentRequest,
};
use crate::storage::Storage;

pub use enrollment::validate_batch_for_course;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    // 按角色列出课程
    pub async fn list_courses(
        &self,
        query: CourseQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn create_course(
        &self,
        create_request: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_course(self, create_request, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_request: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_course(self, course_id, update_request, request).await
    }

    pub async fn create_pricing(
        &self,
        pricing_request: CreateCoursePricingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_course_pricing(self, pricing_request, request).await
    }

    // 学生已购课程 / 教师任教课程
    pub async fn my_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_courses(self, request).await
    }

    pub async fn student_counts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::course_student_counts(self, request).await
    }

    // 学生更换班次
    pub async fn update_enrollment(
        &self,
        subscription_id: i64,
        update_request: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::update_enrollment(self, subscription_id, update_request, request).await
    }
}
