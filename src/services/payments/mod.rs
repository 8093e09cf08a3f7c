pub mod order;
pub mod reports;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::payments::requests::{
    CreateOrderRequest, PaymentRecordsQuery, VerifyPaymentRequest,
};
use crate::storage::Storage;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaymentService {
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

    // 学生下单
    pub async fn create_order(
        &self,
        order_request: CreateOrderRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        order::handle_create_order(self, order_request, request).await
    }

    // 校验支付结果
    pub async fn verify_payment(
        &self,
        verify_request: VerifyPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::handle_verify_payment(self, verify_request, request).await
    }

    // 最近交易
    pub async fn transaction_report(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reports::transaction_report(self, request).await
    }

    pub async fn payment_records(
        &self,
        query: PaymentRecordsQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reports::payment_records(self, query, request).await
    }
}
