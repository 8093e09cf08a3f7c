//! 班次排期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub batch: String,
    pub batch_start_date: Date,
    pub batch_end_date: Date,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::class_sessions::Entity")]
    ClassSessions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::class_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule(self) -> crate::models::courses::entities::ClassSchedule {
        use crate::scheduling::BatchKind;

        crate::models::courses::entities::ClassSchedule {
            id: self.id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            batch: self.batch.parse().unwrap_or(BatchKind::Weekdays),
            batch_start_date: self.batch_start_date,
            batch_end_date: self.batch_end_date,
            created_at: super::from_ts(self.created_at),
        }
    }
}
