use async_trait::async_trait;
use tracing::{info, warn};

use super::{GatewayOrder, OrderNotes, PaymentGateway, signature};
use crate::config::AppConfig;
use crate::errors::{PlatformError, Result};
use crate::utils::random_code::generate_hex;

/// 本地签发订单号的网关
pub struct OfflineGateway {
    key_id: String,
    key_secret: String,
    /// 跳过签名校验，生产环境禁止开启
    test_mode: bool,
}

impl OfflineGateway {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>, test_mode: bool) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            test_mode,
        }
    }

    pub fn from_config() -> Self {
        let payment = &AppConfig::get().payment;
        if payment.test_mode {
            warn!("Payment gateway running in test mode: signatures are not verified");
        }
        Self::new(&payment.key_id, &payment.key_secret, payment.test_mode)
    }
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        notes: &OrderNotes,
    ) -> Result<GatewayOrder> {
        if amount < 0 {
            return Err(PlatformError::payment(format!(
                "Order amount must not be negative (got {amount})."
            )));
        }
        let order = GatewayOrder {
            id: format!("order_{}", generate_hex(14)),
            amount,
            currency: currency.to_string(),
            receipt: notes.receipt.clone(),
        };
        info!(
            "Created order {} for student {} course {} ({} {})",
            order.id, notes.student_id, notes.course_id, amount, currency
        );
        Ok(order)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        if self.test_mode {
            return true;
        }
        signature::verify(&self.key_secret, order_id, payment_id, signature)
    }
}
