use serde::Serialize;
use ts_rs::TS;

use super::entities::OtpPurpose;
use crate::utils::IdentifierKind;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "otp.ts")]
pub struct OtpSentResponse {
    pub identifier: String,
    pub identifier_type: IdentifierKind,
    pub purpose: OtpPurpose,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "otp.ts")]
pub struct OtpVerifiedResponse {
    pub identifier: String,
    pub identifier_type: IdentifierKind,
    pub purpose: OtpPurpose,
}
