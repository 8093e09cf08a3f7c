//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub thumbnail: Option<String>,
    pub duration_hours: i32,
    /// 单位：分
    pub base_price: i64,
    /// JSON 数组
    pub advantages: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_schedules::Entity")]
    ClassSchedules,
    #[sea_orm(has_many = "super::course_pricing::Entity")]
    CoursePricing,
    #[sea_orm(has_many = "super::course_subscriptions::Entity")]
    CourseSubscriptions,
}

impl Related<super::class_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSchedules.def()
    }
}

impl Related<super::course_pricing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoursePricing.def()
    }
}

impl Related<super::course_subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseSubscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course(self) -> crate::models::courses::entities::Course {
        use super::{from_ts, parse_string_list};
        use crate::models::courses::entities::{Course, CourseLevel};

        Course {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            category: self.category,
            level: self.level.parse().unwrap_or(CourseLevel::Beginner),
            thumbnail: self.thumbnail,
            duration_hours: self.duration_hours,
            base_price: self.base_price,
            advantages: parse_string_list(&self.advantages),
            is_active: self.is_active,
            created_at: from_ts(self.created_at),
            updated_at: from_ts(self.updated_at),
        }
    }
}
