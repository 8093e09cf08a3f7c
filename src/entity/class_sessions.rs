//! 课时实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub class_id: String,
    pub schedule_id: i64,
    pub session_date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_schedules::Entity",
        from = "Column::ScheduleId",
        to = "super::class_schedules::Column::Id"
    )]
    Schedule,
}

impl Related<super::class_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_session(self) -> crate::models::courses::entities::ClassSession {
        crate::models::courses::entities::ClassSession {
            id: self.id,
            class_id: self.class_id,
            schedule_id: self.schedule_id,
            session_date: self.session_date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}
