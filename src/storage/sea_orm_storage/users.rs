use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{class_schedules, class_sessions, otps, student_profiles, teacher_profiles, users};
use crate::errors::{PlatformError, Result};
use crate::models::{
    otp::entities::OtpPurpose,
    teachers::requests::NewTeacherSchedule,
    users::{
        entities::{StudentProfile, TeacherProfile, User, UserRole},
        requests::NewUser,
    },
};
use crate::storage::TeacherCreation;

// 单条 INSERT 的课时行数，控制绑定参数数量在各数据库上限之内
const SESSION_INSERT_CHUNK: usize = 150;

fn json_list(values: &[String]) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

/// 在给定连接（或事务）上插入用户
async fn insert_user<C: ConnectionTrait>(conn: &C, user: NewUser) -> Result<UserModel> {
    let now = Utc::now().timestamp();
    let model = users::ActiveModel {
        username: Set(user.username),
        email: Set(user.email),
        phone_number: Set(user.phone_number),
        password_hash: Set(user.password_hash),
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        role: Set(user.role.to_string()),
        status: Set(user.status.to_string()),
        email_verified: Set(user.email_verified),
        phone_verified: Set(user.phone_verified),
        trial_ends_at: Set(user.trial_ends_at.map(|t| t.timestamp())),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| PlatformError::database_operation(format!("创建用户失败: {e}")))
}

async fn insert_teacher_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    profile: &TeacherProfile,
) -> Result<TeacherProfileModel> {
    let now = Utc::now().timestamp();
    let model = teacher_profiles::ActiveModel {
        user_id: Set(user_id),
        qualification: Set(profile.qualification.clone()),
        experience_years: Set(profile.experience_years),
        specialization: Set(json_list(&profile.specialization)?),
        bio: Set(profile.bio.clone()),
        linkedin_url: Set(profile.linkedin_url.clone()),
        teaching_languages: Set(json_list(&profile.teaching_languages)?),
        is_verified: Set(profile.is_verified),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(conn).await?)
}

impl SeaOrmStorage {
    pub async fn count_users_impl(&self) -> Result<u64> {
        Ok(Users::find().count(&self.db).await?)
    }

    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        Ok(insert_user(&self.db, user).await?.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PlatformError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    async fn find_user_by(&self, condition: Condition) -> Result<Option<User>> {
        let result = Users::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| PlatformError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user_by(Condition::all().add(users::Column::Email.eq(email)))
            .await
    }

    pub async fn get_user_by_phone_impl(&self, phone: &str) -> Result<Option<User>> {
        self.find_user_by(Condition::all().add(users::Column::PhoneNumber.eq(phone)))
            .await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user_by(Condition::all().add(users::Column::Username.eq(username)))
            .await
    }

    pub async fn find_user_by_login_identifier_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user_by(
            Condition::any()
                .add(users::Column::Email.eq(identifier))
                .add(users::Column::PhoneNumber.eq(identifier))
                .add(users::Column::Username.eq(identifier)),
        )
        .await
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<()> {
        let now = Utc::now().timestamp();
        Users::update_many()
            .col_expr(users::Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PlatformError::database_operation(format!("更新登录时间失败: {e}")))?;
        Ok(())
    }

    pub async fn update_user_password_impl(&self, id: i64, password_hash: &str) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlatformError::not_found(format!("User {id} not found.")))?;

        let mut active: UserActiveModel = user.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now().timestamp());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn list_users_by_role_impl(&self, role: UserRole) -> Result<Vec<User>> {
        let models = Users::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_user()).collect())
    }

    pub async fn get_teacher_profile_impl(&self, user_id: i64) -> Result<Option<TeacherProfile>> {
        let model = TeacherProfiles::find()
            .filter(teacher_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_profile()))
    }

    pub async fn get_student_profile_impl(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        let model = StudentProfiles::find()
            .filter(student_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_profile()))
    }

    pub async fn save_teacher_profile_impl(
        &self,
        user_id: i64,
        profile: TeacherProfile,
    ) -> Result<TeacherProfile> {
        let existing = TeacherProfiles::find()
            .filter(teacher_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        let saved = match existing {
            Some(model) => {
                let mut active: TeacherProfileActiveModel = model.into();
                active.qualification = Set(profile.qualification);
                active.experience_years = Set(profile.experience_years);
                active.specialization = Set(json_list(&profile.specialization)?);
                active.bio = Set(profile.bio);
                active.linkedin_url = Set(profile.linkedin_url);
                active.teaching_languages = Set(json_list(&profile.teaching_languages)?);
                active.updated_at = Set(Utc::now().timestamp());
                active.update(&self.db).await?
            }
            None => insert_teacher_profile(&self.db, user_id, &profile).await?,
        };
        Ok(saved.into_profile())
    }

    pub async fn register_student_impl(&self, user: NewUser) -> Result<User> {
        let email = user.email.clone();
        let phone = user.phone_number.clone();

        let txn = self.db.begin().await?;

        let created = insert_user(&txn, user).await?;
        student_profiles::ActiveModel {
            user_id: Set(created.id),
            profile_picture: Set(None),
            created_at: Set(created.created_at),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let identifiers: Vec<String> = std::iter::once(email).chain(phone).collect();
        Otps::delete_many()
            .filter(otps::Column::Identifier.is_in(identifiers))
            .filter(otps::Column::Purpose.eq(OtpPurpose::Registration.as_str()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(created.into_user())
    }

    pub async fn create_teacher_with_schedules_impl(
        &self,
        user: NewUser,
        schedules: Vec<NewTeacherSchedule>,
    ) -> Result<TeacherCreation> {
        let txn = self.db.begin().await?;

        let teacher = insert_user(&txn, user).await?;
        insert_teacher_profile(&txn, teacher.id, &TeacherProfile::empty()).await?;

        let now = Utc::now().timestamp();
        let schedule_count = schedules.len();
        let mut session_count = 0;
        for NewTeacherSchedule { plan, sessions } in schedules {
            let schedule = class_schedules::ActiveModel {
                course_id: Set(plan.course_id),
                teacher_id: Set(teacher.id),
                batch: Set(plan.batch.to_string()),
                batch_start_date: Set(plan.start_date),
                batch_end_date: Set(plan.end_date),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            session_count += sessions.len();
            for chunk in sessions.chunks(SESSION_INSERT_CHUNK) {
                let rows = chunk.iter().map(|s| class_sessions::ActiveModel {
                    class_id: Set(s.class_id.clone()),
                    schedule_id: Set(schedule.id),
                    session_date: Set(s.session_date),
                    start_time: Set(s.start_time),
                    end_time: Set(s.end_time),
                    ..Default::default()
                });
                ClassSessions::insert_many(rows).exec(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok((teacher.into_user(), schedule_count, session_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::new_user;

    #[actix_web::test]
    async fn test_create_and_find_user() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);

        let user = storage
            .create_user_impl(new_user("asha", "asha@example.com", "9876543210", UserRole::Admin))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);

        for identifier in ["asha", "asha@example.com", "9876543210"] {
            let found = storage
                .find_user_by_login_identifier_impl(identifier)
                .await
                .unwrap();
            assert_eq!(found.map(|u| u.id), Some(user.id));
        }
        assert!(
            storage
                .find_user_by_login_identifier_impl("nobody")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_teacher_profile_upsert() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = storage
            .create_user_impl(new_user("ravi", "ravi@example.com", "9876500000", UserRole::Teacher))
            .await
            .unwrap();
        assert!(storage.get_teacher_profile_impl(teacher.id).await.unwrap().is_none());

        let mut profile = TeacherProfile::empty();
        profile.specialization = vec!["Rust".into()];
        storage
            .save_teacher_profile_impl(teacher.id, profile.clone())
            .await
            .unwrap();

        profile.experience_years = 7;
        let saved = storage
            .save_teacher_profile_impl(teacher.id, profile)
            .await
            .unwrap();
        assert_eq!(saved.experience_years, 7);
        assert_eq!(saved.specialization, vec!["Rust".to_string()]);
    }
}
