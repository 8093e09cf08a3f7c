use serde::Deserialize;
use ts_rs::TS;

use super::entities::OtpPurpose;
use crate::utils::IdentifierKind;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "otp.ts")]
pub struct SendOtpRequest {
    pub identifier: String,
    #[serde(default)]
    pub identifier_type: Option<IdentifierKind>,
    pub purpose: OtpPurpose,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "otp.ts")]
pub struct VerifyOtpRequest {
    pub identifier: String,
    #[serde(default)]
    pub identifier_type: Option<IdentifierKind>,
    pub otp_code: String,
    pub purpose: OtpPurpose,
}
