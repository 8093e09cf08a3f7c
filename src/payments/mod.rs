//! 支付网关
//!
//! 业务层只依赖 `PaymentGateway`，默认实现为本地签发订单号、
//! 按 Razorpay 规则校验签名的离线网关。

mod offline;
pub mod signature;

pub use offline::OfflineGateway;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;

/// 下单时附带的备注
#[derive(Debug, Clone, Serialize)]
pub struct OrderNotes {
    pub receipt: String,
    pub student_id: i64,
    pub course_id: i64,
    pub batch: String,
}

/// 网关返回的订单
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOrder {
    pub id: String,
    /// 单位：分
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 前端发起支付使用的公钥
    fn key_id(&self) -> &str;

    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        notes: &OrderNotes,
    ) -> Result<GatewayOrder>;

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}
