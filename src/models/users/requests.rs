use serde::Deserialize;
use ts_rs::TS;

use super::entities::{UserRole, UserStatus};

// 管理员创建管理员账号
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct CreateAdminRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

// 教师更新自己的资料
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UpdateTeacherProfileRequest {
    pub qualification: Option<String>,
    pub experience_years: Option<i32>,
    pub specialization: Option<Vec<String>>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub teaching_languages: Option<Vec<String>>,
}

/// 存储层创建用户所需的数据（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub trial_ends_at: Option<chrono::DateTime<chrono::Utc>>,
}
