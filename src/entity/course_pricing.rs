//! 课程定价实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_pricing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub original_price: i64,
    pub discount_percent: i32,
    pub final_price: i64,
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
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_pricing(self) -> crate::models::courses::entities::CoursePricing {
        crate::models::courses::entities::CoursePricing {
            id: self.id,
            course_id: self.course_id,
            original_price: self.original_price,
            discount_percent: self.discount_percent,
            final_price: self.final_price,
            created_at: super::from_ts(self.created_at),
        }
    }
}
