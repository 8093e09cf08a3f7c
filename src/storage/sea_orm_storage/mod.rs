//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod courses;
mod otps;
mod payments;
mod schedules;
mod users;

use crate::config::AppConfig;
use crate::errors::{PlatformError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::migrated(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    async fn migrated(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| PlatformError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 单连接内存库，供测试使用
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrated(db).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PlatformError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PlatformError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PlatformError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PlatformError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}


use crate::models::{
    courses::{
        entities::{ClassSchedule, ClassSession, Course, CoursePricing},
        requests::{NewCourse, UpdateCourseRequest},
    },
    otp::entities::{NewOtp, Otp, OtpLookup, OtpPurpose},
    payments::entities::{
        Enrollment, NewSubscription, PaymentRecordFilter, PaymentStatus, Subscription,
    },
    teachers::requests::NewTeacherSchedule,
    users::{
        entities::{StudentProfile, TeacherProfile, User, UserRole},
        requests::NewUser,
    },
};
use crate::scheduling::BatchKind;
use crate::storage::{Storage, TeacherCreation};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>> {
        self.get_user_by_phone_impl(phone).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn find_user_by_login_identifier(&self, identifier: &str) -> Result<Option<User>> {
        self.find_user_by_login_identifier_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<()> {
        self.update_last_login_impl(id).await
    }

    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<()> {
        self.update_user_password_impl(id, password_hash).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.list_users_by_role_impl(role).await
    }

    async fn get_teacher_profile(&self, user_id: i64) -> Result<Option<TeacherProfile>> {
        self.get_teacher_profile_impl(user_id).await
    }

    async fn get_student_profile(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        self.get_student_profile_impl(user_id).await
    }

    async fn save_teacher_profile(
        &self,
        user_id: i64,
        profile: TeacherProfile,
    ) -> Result<TeacherProfile> {
        self.save_teacher_profile_impl(user_id, profile).await
    }

    async fn register_student(&self, user: NewUser) -> Result<User> {
        self.register_student_impl(user).await
    }

    async fn create_teacher_with_schedules(
        &self,
        user: NewUser,
        schedules: Vec<NewTeacherSchedule>,
    ) -> Result<TeacherCreation> {
        self.create_teacher_with_schedules_impl(user, schedules)
            .await
    }

    // 验证码模块
    async fn create_otp(&self, otp: NewOtp) -> Result<Otp> {
        self.create_otp_impl(otp).await
    }

    async fn find_latest_otp(&self, lookup: OtpLookup<'_>) -> Result<Option<Otp>> {
        self.find_latest_otp_impl(lookup).await
    }

    async fn mark_otp_verified(&self, id: i64) -> Result<()> {
        self.mark_otp_verified_impl(id).await
    }

    async fn delete_otps(&self, identifier: &str, purpose: OtpPurpose) -> Result<u64> {
        self.delete_otps_impl(identifier, purpose).await
    }

    // 课程模块
    async fn list_courses(&self, active_only: bool) -> Result<Vec<Course>> {
        self.list_courses_impl(active_only).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn course_name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.course_name_exists_impl(name, exclude_id).await
    }

    async fn course_slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.course_slug_exists_impl(slug, exclude_id).await
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn create_course_pricing(
        &self,
        course_id: i64,
        original_price: i64,
        discount_percent: i32,
        final_price: i64,
    ) -> Result<CoursePricing> {
        self.create_course_pricing_impl(course_id, original_price, discount_percent, final_price)
            .await
    }

    // 排期模块
    async fn list_schedules(
        &self,
        course_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<Vec<ClassSchedule>> {
        self.list_schedules_impl(course_id, teacher_id).await
    }

    async fn list_sessions_for_schedules(&self, schedule_ids: &[i64]) -> Result<Vec<ClassSession>> {
        self.list_sessions_for_schedules_impl(schedule_ids).await
    }

    // 支付模块
    async fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        self.get_subscription_impl(id).await
    }

    async fn find_subscription(
        &self,
        student_id: i64,
        course_id: i64,
        status: PaymentStatus,
    ) -> Result<Option<Subscription>> {
        self.find_subscription_impl(student_id, course_id, status)
            .await
    }

    async fn list_subscriptions(
        &self,
        student_id: Option<i64>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Subscription>> {
        self.list_subscriptions_impl(student_id, status).await
    }

    async fn create_subscription(&self, subscription: NewSubscription) -> Result<Subscription> {
        self.create_subscription_impl(subscription).await
    }

    async fn renew_subscription_order(
        &self,
        id: i64,
        order_id: &str,
        amount: i64,
    ) -> Result<Subscription> {
        self.renew_subscription_order_impl(id, order_id, amount)
            .await
    }

    async fn complete_subscription(
        &self,
        id: i64,
        payment_id: &str,
        response: serde_json::Value,
    ) -> Result<Subscription> {
        self.settle_subscription_impl(id, payment_id, response, PaymentStatus::Completed)
            .await
    }

    async fn fail_subscription(
        &self,
        id: i64,
        payment_id: &str,
        response: serde_json::Value,
    ) -> Result<Subscription> {
        self.settle_subscription_impl(id, payment_id, response, PaymentStatus::Failed)
            .await
    }

    async fn list_recent_subscriptions(&self, limit: u64) -> Result<Vec<Subscription>> {
        self.list_recent_subscriptions_impl(limit).await
    }

    async fn list_payment_records(
        &self,
        filter: PaymentRecordFilter,
        page: u64,
        size: u64,
    ) -> Result<(Vec<Subscription>, u64)> {
        self.list_payment_records_impl(filter, page, size).await
    }

    // 选课模块
    async fn upsert_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        subscription_id: i64,
        batch: BatchKind,
    ) -> Result<Enrollment> {
        self.upsert_enrollment_impl(student_id, course_id, subscription_id, batch)
            .await
    }

    async fn get_enrollment_by_subscription(
        &self,
        subscription_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_subscription_impl(subscription_id)
            .await
    }

    async fn update_enrollment_batch(&self, id: i64, batch: BatchKind) -> Result<Enrollment> {
        self.update_enrollment_batch_impl(id, batch).await
    }

    async fn list_enrollments(&self, student_id: Option<i64>) -> Result<Vec<Enrollment>> {
        self.list_enrollments_impl(student_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::courses::{entities::CourseLevel, requests::NewCourse};
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::models::users::requests::NewUser;

    pub(crate) fn new_course(name: &str) -> NewCourse {
        NewCourse {
            name: name.into(),
            slug: crate::utils::slug::slugify(name),
            description: "Hands-on course".into(),
            category: "Programming".into(),
            level: CourseLevel::Beginner,
            thumbnail: None,
            duration_hours: 30,
            base_price: 250_000,
            advantages: vec!["Live classes".into()],
            is_active: true,
        }
    }

    pub(crate) fn new_user(username: &str, email: &str, phone: &str, role: UserRole) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            phone_number: Some(phone.into()),
            password_hash: "hash".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            role,
            status: UserStatus::Active,
            email_verified: true,
            phone_verified: true,
            trial_ends_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("data/edu.db").unwrap(),
            "sqlite://data/edu.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/edu").unwrap(),
            "postgres://u:p@localhost/edu"
        );
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }
}
