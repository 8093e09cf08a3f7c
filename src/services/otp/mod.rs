pub mod send;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::otp::requests::{SendOtpRequest, VerifyOtpRequest};
use crate::storage::Storage;

pub struct OtpService {
    storage: Option<Arc<dyn Storage>>,
}

impl OtpService {
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

    // 发送验证码
    pub async fn send(
        &self,
        send_request: SendOtpRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        send::handle_send_otp(self, send_request, request).await
    }

    // 校验验证码
    pub async fn verify(
        &self,
        verify_request: VerifyOtpRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::handle_verify_otp(self, verify_request, request).await
    }
}
