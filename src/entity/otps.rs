//! 一次性验证码实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "otps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub identifier: String,
    pub channel: String,
    pub purpose: String,
    pub code: String,
    pub is_verified: bool,
    pub expires_at: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_otp(self) -> crate::models::otp::entities::Otp {
        use super::from_ts;
        use crate::models::otp::entities::{Otp, OtpPurpose};
        use crate::utils::IdentifierKind;

        Otp {
            id: self.id,
            identifier: self.identifier,
            channel: self.channel.parse().unwrap_or(IdentifierKind::Email),
            purpose: self.purpose.parse().unwrap_or(OtpPurpose::Registration),
            code: self.code,
            is_verified: self.is_verified,
            expires_at: from_ts(self.expires_at),
            created_at: from_ts(self.created_at),
        }
    }
}
