//! 教师资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub qualification: String,
    pub experience_years: i32,
    /// JSON 数组
    pub specialization: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    /// JSON 数组
    pub teaching_languages: String,
    pub is_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_profile(self) -> crate::models::users::entities::TeacherProfile {
        use super::parse_string_list;

        crate::models::users::entities::TeacherProfile {
            qualification: self.qualification,
            experience_years: self.experience_years,
            specialization: parse_string_list(&self.specialization),
            bio: self.bio,
            linkedin_url: self.linkedin_url,
            teaching_languages: parse_string_list(&self.teaching_languages),
            is_verified: self.is_verified,
        }
    }
}
