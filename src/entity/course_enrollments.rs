//! 选课实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    #[sea_orm(unique)]
    pub subscription_id: i64,
    pub batch: String,
    pub enrolled_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_subscriptions::Entity",
        from = "Column::SubscriptionId",
        to = "super::course_subscriptions::Column::Id"
    )]
    Subscription,
}

impl Related<super::course_subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::payments::entities::Enrollment {
        use crate::scheduling::BatchKind;

        crate::models::payments::entities::Enrollment {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            subscription_id: self.subscription_id,
            batch: self.batch.parse().unwrap_or(BatchKind::Weekdays),
            enrolled_at: super::from_ts(self.enrolled_at),
        }
    }
}
