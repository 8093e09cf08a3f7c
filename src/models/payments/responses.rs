use serde::Serialize;
use ts_rs::TS;

use super::entities::PaymentStatus;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct OrderResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
    pub subscription_id: i64,
    pub batch: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct VerifyPaymentResponse {
    pub subscription_id: i64,
    pub course_name: String,
    pub batch: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub enum TransactionOutcome {
    Success,
    Failure,
}

impl From<PaymentStatus> for TransactionOutcome {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed => TransactionOutcome::Success,
            _ => TransactionOutcome::Failure,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct TransactionReportItem {
    pub payment_mode: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub message_info: TransactionOutcome,
    pub amount: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct PaymentRecordItem {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub course: String,
    pub batch: Option<String>,
    pub registration_date_time: chrono::DateTime<chrono::Utc>,
    pub payment_method: String,
    pub amount_paid: i64,
    pub start_date_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date_time: Option<chrono::DateTime<chrono::Utc>>,
    pub status: PaymentStatus,
}
