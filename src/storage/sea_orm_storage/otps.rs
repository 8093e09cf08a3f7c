use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::SeaOrmStorage;
use crate::entity::otps;
use crate::entity::prelude::*;
use crate::errors::{PlatformError, Result};
use crate::models::otp::entities::{NewOtp, Otp, OtpLookup, OtpPurpose};

impl SeaOrmStorage {
    pub async fn create_otp_impl(&self, otp: NewOtp) -> Result<Otp> {
        let model = otps::ActiveModel {
            identifier: Set(otp.identifier),
            channel: Set(otp.channel.as_str().to_string()),
            purpose: Set(otp.purpose.as_str().to_string()),
            code: Set(otp.code),
            is_verified: Set(false),
            expires_at: Set(otp.expires_at.timestamp()),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| PlatformError::database_operation(format!("保存验证码失败: {e}")))?;

        Ok(model.into_otp())
    }

    /// 最新一条匹配的验证码
    pub async fn find_latest_otp_impl(&self, lookup: OtpLookup<'_>) -> Result<Option<Otp>> {
        let mut select = Otps::find()
            .filter(otps::Column::Identifier.eq(lookup.identifier))
            .filter(otps::Column::Channel.eq(lookup.channel.as_str()))
            .filter(otps::Column::Purpose.eq(lookup.purpose.as_str()));

        if let Some(code) = lookup.code {
            select = select.filter(otps::Column::Code.eq(code));
        }
        if lookup.verified_only {
            select = select.filter(otps::Column::IsVerified.eq(true));
        }

        let model = select
            .order_by_desc(otps::Column::CreatedAt)
            .order_by_desc(otps::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_otp()))
    }

    pub async fn mark_otp_verified_impl(&self, id: i64) -> Result<()> {
        let model = Otps::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlatformError::not_found("OTP not found."))?;

        let mut active: OtpActiveModel = model.into();
        active.is_verified = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn delete_otps_impl(&self, identifier: &str, purpose: OtpPurpose) -> Result<u64> {
        let result = Otps::delete_many()
            .filter(otps::Column::Identifier.eq(identifier))
            .filter(otps::Column::Purpose.eq(purpose.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::IdentifierKind;

    fn new_otp(code: &str, purpose: OtpPurpose) -> NewOtp {
        NewOtp {
            identifier: "asha@example.com".into(),
            channel: IdentifierKind::Email,
            purpose,
            code: code.into(),
            expires_at: Utc::now() + chrono::Duration::minutes(10),
        }
    }

    fn lookup(code: Option<&str>, verified_only: bool) -> OtpLookup<'_> {
        OtpLookup {
            identifier: "asha@example.com",
            channel: IdentifierKind::Email,
            purpose: OtpPurpose::Registration,
            code,
            verified_only,
        }
    }

    #[actix_web::test]
    async fn test_latest_otp_and_verification() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_otp_impl(new_otp("1111", OtpPurpose::Registration))
            .await
            .unwrap();
        let second = storage
            .create_otp_impl(new_otp("2222", OtpPurpose::Registration))
            .await
            .unwrap();

        let latest = storage.find_latest_otp_impl(lookup(None, false)).await.unwrap();
        assert_eq!(latest.map(|o| o.code), Some("2222".to_string()));

        let by_code = storage
            .find_latest_otp_impl(lookup(Some("1111"), false))
            .await
            .unwrap();
        assert!(by_code.is_some());

        assert!(storage.find_latest_otp_impl(lookup(None, true)).await.unwrap().is_none());
        storage.mark_otp_verified_impl(second.id).await.unwrap();
        let verified = storage.find_latest_otp_impl(lookup(None, true)).await.unwrap();
        assert_eq!(verified.map(|o| o.id), Some(second.id));
    }

    #[actix_web::test]
    async fn test_delete_by_purpose() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_otp_impl(new_otp("1111", OtpPurpose::Registration))
            .await
            .unwrap();
        storage
            .create_otp_impl(new_otp("2222", OtpPurpose::PasswordReset))
            .await
            .unwrap();

        let deleted = storage
            .delete_otps_impl("asha@example.com", OtpPurpose::PasswordReset)
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(storage.find_latest_otp_impl(lookup(None, false)).await.unwrap().is_some());
    }
}
