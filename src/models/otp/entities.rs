use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::utils::IdentifierKind;

// 验证码用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "otp.ts")]
pub enum OtpPurpose {
    Registration,
    PasswordReset,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "registration",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }

    /// 邮件标题
    pub fn email_subject(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "Your OTP for Registration",
            OtpPurpose::PasswordReset => "Your OTP for Password Reset",
        }
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(OtpPurpose::Registration),
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            _ => Err(format!("Invalid OTP purpose: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Otp {
    pub id: i64,
    pub identifier: String,
    pub channel: IdentifierKind,
    pub purpose: OtpPurpose,
    pub code: String,
    pub is_verified: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// 验证码查询条件
#[derive(Debug, Clone)]
pub struct OtpLookup<'a> {
    pub identifier: &'a str,
    pub channel: IdentifierKind,
    pub purpose: OtpPurpose,
    pub code: Option<&'a str>,
    pub verified_only: bool,
}

/// 新建验证码
#[derive(Debug, Clone)]
pub struct NewOtp {
    pub identifier: String,
    pub channel: IdentifierKind,
    pub purpose: OtpPurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
