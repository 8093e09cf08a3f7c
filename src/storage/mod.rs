use std::sync::Arc;

use crate::errors::Result;
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

pub mod sea_orm_storage;

/// 教师创建结果：(教师, 排期数, 课时数)
pub type TeacherCreation = (User, usize, usize);

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户
    async fn count_users(&self) -> Result<u64>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 邮箱、手机号或用户名任一匹配
    async fn find_user_by_login_identifier(&self, identifier: &str) -> Result<Option<User>>;
    async fn update_last_login(&self, id: i64) -> Result<()>;
    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<()>;
    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>>;
    async fn get_teacher_profile(&self, user_id: i64) -> Result<Option<TeacherProfile>>;
    async fn get_student_profile(&self, user_id: i64) -> Result<Option<StudentProfile>>;
    async fn save_teacher_profile(
        &self,
        user_id: i64,
        profile: TeacherProfile,
    ) -> Result<TeacherProfile>;
    // 事务：学生 + 学生资料 + 清理注册验证码
    async fn register_student(&self, user: NewUser) -> Result<User>;
    // 事务：教师 + 空资料 + 排期 + 课时
    async fn create_teacher_with_schedules(
        &self,
        user: NewUser,
        schedules: Vec<NewTeacherSchedule>,
    ) -> Result<TeacherCreation>;

    /// 验证码
    async fn create_otp(&self, otp: NewOtp) -> Result<Otp>;
    async fn find_latest_otp(&self, lookup: OtpLookup<'_>) -> Result<Option<Otp>>;
    async fn mark_otp_verified(&self, id: i64) -> Result<()>;
    async fn delete_otps(&self, identifier: &str, purpose: OtpPurpose) -> Result<u64>;

    /// 课程
    async fn list_courses(&self, active_only: bool) -> Result<Vec<Course>>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn course_name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool>;
    async fn course_slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn create_course_pricing(
        &self,
        course_id: i64,
        original_price: i64,
        discount_percent: i32,
        final_price: i64,
    ) -> Result<CoursePricing>;

    /// 排期与课时
    async fn list_schedules(
        &self,
        course_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<Vec<ClassSchedule>>;
    async fn list_sessions_for_schedules(&self, schedule_ids: &[i64]) -> Result<Vec<ClassSession>>;

    /// 订阅与支付
    async fn get_subscription(&self, id: i64) -> Result<Option<Subscription>>;
    async fn find_subscription(
        &self,
        student_id: i64,
        course_id: i64,
        status: PaymentStatus,
    ) -> Result<Option<Subscription>>;
    async fn list_subscriptions(
        &self,
        student_id: Option<i64>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Subscription>>;
    async fn create_subscription(&self, subscription: NewSubscription) -> Result<Subscription>;
    // 复用待支付订阅：新订单号、新金额，购买时间重置为当前
    async fn renew_subscription_order(
        &self,
        id: i64,
        order_id: &str,
        amount: i64,
    ) -> Result<Subscription>;
    async fn complete_subscription(
        &self,
        id: i64,
        payment_id: &str,
        response: serde_json::Value,
    ) -> Result<Subscription>;
    async fn fail_subscription(
        &self,
        id: i64,
        payment_id: &str,
        response: serde_json::Value,
    ) -> Result<Subscription>;
    async fn list_recent_subscriptions(&self, limit: u64) -> Result<Vec<Subscription>>;
    async fn list_payment_records(
        &self,
        filter: PaymentRecordFilter,
        page: u64,
        size: u64,
    ) -> Result<(Vec<Subscription>, u64)>;

    /// 选课
    async fn upsert_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        subscription_id: i64,
        batch: BatchKind,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_subscription(
        &self,
        subscription_id: i64,
    ) -> Result<Option<Enrollment>>;
    async fn update_enrollment_batch(&self, id: i64, batch: BatchKind) -> Result<Enrollment>;
    async fn list_enrollments(&self, student_id: Option<i64>) -> Result<Vec<Enrollment>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
