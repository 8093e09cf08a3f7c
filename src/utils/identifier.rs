//! 登录/验证码标识符识别（邮箱或手机号）

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::validate::{EMAIL_RE, PHONE_RE};

/// 标识符类型，同时作为验证码的发送渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "otp.ts")]
pub enum IdentifierKind {
    Email,
    Phone,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Email => "email",
            IdentifierKind::Phone => "phone",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IdentifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(IdentifierKind::Email),
            "phone" => Ok(IdentifierKind::Phone),
            _ => Err(format!("Invalid identifier type: {s}")),
        }
    }
}

/// 识别标识符类型
///
/// 给出 `hint` 时只校验对应格式；否则先尝试邮箱再尝试手机号。
pub fn detect_identifier(
    value: &str,
    hint: Option<IdentifierKind>,
) -> Result<IdentifierKind, &'static str> {
    match hint {
        Some(IdentifierKind::Email) => {
            if EMAIL_RE.is_match(value) {
                Ok(IdentifierKind::Email)
            } else {
                Err("Invalid email format.")
            }
        }
        Some(IdentifierKind::Phone) => {
            if PHONE_RE.is_match(value) {
                Ok(IdentifierKind::Phone)
            } else {
                Err("Invalid phone number. Must be 10-15 digits, optionally starting with +.")
            }
        }
        None => {
            if value.contains('@') && EMAIL_RE.is_match(value) {
                Ok(IdentifierKind::Email)
            } else if PHONE_RE.is_match(value) {
                Ok(IdentifierKind::Phone)
            } else {
                Err("Invalid identifier. Must be a valid email or phone number (10-15 digits).")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_without_hint() {
        assert_eq!(
            detect_identifier("student@example.com", None),
            Ok(IdentifierKind::Email)
        );
        assert_eq!(
            detect_identifier("+919876543210", None),
            Ok(IdentifierKind::Phone)
        );
        assert_eq!(
            detect_identifier("not-an-identifier", None),
            Err("Invalid identifier. Must be a valid email or phone number (10-15 digits).")
        );
    }

    #[test]
    fn test_detect_with_hint() {
        assert_eq!(
            detect_identifier("9876543210", Some(IdentifierKind::Email)),
            Err("Invalid email format.")
        );
        assert_eq!(
            detect_identifier("student@example.com", Some(IdentifierKind::Phone)),
            Err("Invalid phone number. Must be 10-15 digits, optionally starting with +.")
        );
        assert_eq!(
            detect_identifier("9876543210", Some(IdentifierKind::Phone)),
            Ok(IdentifierKind::Phone)
        );
    }

    #[test]
    fn test_kind_round_trip_str() {
        assert_eq!("email".parse::<IdentifierKind>(), Ok(IdentifierKind::Email));
        assert_eq!(IdentifierKind::Phone.to_string(), "phone");
        assert!("sms".parse::<IdentifierKind>().is_err());
    }
}
