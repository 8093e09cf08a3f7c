//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod class_schedules;
pub mod class_sessions;
pub mod course_enrollments;
pub mod course_pricing;
pub mod course_subscriptions;
pub mod courses;
pub mod otps;
pub mod student_profiles;
pub mod teacher_profiles;
pub mod users;

use chrono::{DateTime, Utc};

pub(crate) fn from_ts(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// JSON 文本列解析为字符串列表，损坏的数据视为空列表
pub(crate) fn parse_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
