use serde::Serialize;
use ts_rs::TS;

use super::entities::{StudentProfile, TeacherProfile, User};

/// 当前用户及其角色资料
#[derive(Debug, Serialize, TS)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum RoleProfile {
    Teacher(TeacherProfile),
    Student(StudentProfile),
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub user: User,
    pub full_name: String,
    pub is_verified: bool,
    pub profile: Option<RoleProfile>,
}

impl UserResponse {
    pub fn new(user: User, profile: Option<RoleProfile>) -> Self {
        Self {
            full_name: user.full_name(),
            is_verified: user.is_verified(),
            user,
            profile,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct TeacherListItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub course_assigned: Vec<String>,
    pub batches: Vec<String>,
    pub status: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct StudentListItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enrolled_courses: Vec<String>,
    pub batches: Vec<String>,
    pub registration_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum TrialStatus {
    TrialActive,
    TrialExpired,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct NotEnrolledStudentItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub registration_date_time: chrono::DateTime<chrono::Utc>,
    pub remaining_days: i64,
    pub status: TrialStatus,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserStatusCounts {
    pub active_users: u64,
    pub registered_users: u64,
    pub deactivated_users: u64,
}
