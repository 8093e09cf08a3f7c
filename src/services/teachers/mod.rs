pub mod create;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::storage::Storage;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
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

    // 管理员创建教师并排课
    pub async fn create_teacher(
        &self,
        create_request: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_teacher(self, create_request, request).await
    }
}
