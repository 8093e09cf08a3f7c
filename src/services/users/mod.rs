pub mod create;
pub mod list;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::CreateAdminRequest;
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
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

    // 管理员创建管理员
    pub async fn create_admin(
        &self,
        create_request: CreateAdminRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_admin(self, create_request, request).await
    }

    pub async fn list_teachers(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_teachers(self, request).await
    }

    pub async fn list_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_students(self, request).await
    }

    // 没有已完成订阅的学生
    pub async fn list_students_not_enrolled(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students_not_enrolled(self, request).await
    }

    pub async fn status_counts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::user_status_counts(self, request).await
    }
}
