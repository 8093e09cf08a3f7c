//! 课程订阅实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub amount_paid: i64,
    pub currency: String,
    pub order_id: String,
    pub payment_id: Option<String>,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_response: Option<String>,
    pub is_active: bool,
    pub purchased_at: i64,
    pub payment_completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_one = "super::course_enrollments::Entity")]
    Enrollment,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::course_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subscription(self) -> crate::models::payments::entities::Subscription {
        use super::from_ts;
        use crate::models::payments::entities::{PaymentStatus, Subscription};

        Subscription {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            amount_paid: self.amount_paid,
            currency: self.currency,
            order_id: self.order_id,
            payment_id: self.payment_id,
            payment_method: self.payment_method,
            payment_status: self
                .payment_status
                .parse()
                .unwrap_or(PaymentStatus::Pending),
            payment_response: self
                .payment_response
                .and_then(|raw| serde_json::from_str(&raw).ok()),
            is_active: self.is_active,
            purchased_at: from_ts(self.purchased_at),
            payment_completed_at: self.payment_completed_at.map(from_ts),
        }
    }
}
