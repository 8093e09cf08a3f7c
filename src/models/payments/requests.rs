use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct CreateOrderRequest {
    pub course_id: i64,
    pub batch: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub subscription_id: i64,
}

// 支付记录查询参数，日期格式 YYYY-MM-DD
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct PaymentRecordsQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub course: Option<String>,
    pub status: Option<String>,
}
