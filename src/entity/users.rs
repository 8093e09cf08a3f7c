//! 用户实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub trial_ends_at: Option<i64>,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::teacher_profiles::Entity")]
    TeacherProfile,
    #[sea_orm(has_one = "super::student_profiles::Entity")]
    StudentProfile,
    #[sea_orm(has_many = "super::class_schedules::Entity")]
    ClassSchedules,
    #[sea_orm(has_many = "super::course_subscriptions::Entity")]
    CourseSubscriptions,
}

impl Related<super::teacher_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherProfile.def()
    }
}

impl Related<super::student_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProfile.def()
    }
}

impl Related<super::class_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSchedules.def()
    }
}

impl Related<super::course_subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseSubscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserRole, UserStatus};
        use super::from_ts;

        User {
            id: self.id,
            username: self.username,
            email: self.email,
            phone_number: self.phone_number,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            status: self
                .status
                .parse::<UserStatus>()
                .unwrap_or(UserStatus::Inactive),
            email_verified: self.email_verified,
            phone_verified: self.phone_verified,
            trial_ends_at: self.trial_ends_at.map(from_ts),
            last_login: self.last_login.map(from_ts),
            created_at: from_ts(self.created_at),
            updated_at: from_ts(self.updated_at),
        }
    }
}
