use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scheduling::BatchKind;

// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "payment.ts")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

// 学生购买课程的订阅记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub amount_paid: i64,
    pub currency: String,
    pub order_id: String,
    pub payment_id: Option<String>,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub payment_response: Option<serde_json::Value>,
    pub is_active: bool,
    pub purchased_at: DateTime<Utc>,
    pub payment_completed_at: Option<DateTime<Utc>>,
}

// 学生、课程与所选班次的关联
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub subscription_id: i64,
    pub batch: BatchKind,
    pub enrolled_at: DateTime<Utc>,
}

/// 新建订阅
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub student_id: i64,
    pub course_id: i64,
    pub amount_paid: i64,
    pub currency: String,
    pub order_id: String,
    pub payment_method: String,
}

/// 支付记录筛选条件（按完成时间）
#[derive(Debug, Clone, Default)]
pub struct PaymentRecordFilter {
    pub completed_from: Option<DateTime<Utc>>,
    pub completed_to: Option<DateTime<Utc>>,
    pub course_ids: Option<Vec<i64>>,
    pub status: Option<PaymentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("Completed".parse::<PaymentStatus>(), Ok(PaymentStatus::Completed));
        assert_eq!("FAILED".parse::<PaymentStatus>(), Ok(PaymentStatus::Failed));
        assert!("refunded".parse::<PaymentStatus>().is_err());
        assert_eq!(PaymentStatus::Pending.to_string(), "pending");
    }
}
