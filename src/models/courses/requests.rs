use serde::Deserialize;
use ts_rs::TS;

use super::entities::CourseLevel;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateCourseRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub duration_hours: i32,
    pub base_price: i64,
    #[serde(default)]
    pub advantages: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// 部分更新，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub thumbnail: Option<String>,
    pub duration_hours: Option<i32>,
    pub base_price: Option<i64>,
    pub advantages: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateCoursePricingRequest {
    pub course: i64,
    pub original_price: i64,
    pub discount_percent: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct UpdateEnrollmentRequest {
    pub batch: String,
}

/// 存储层新建课程所需的数据
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub thumbnail: Option<String>,
    pub duration_hours: i32,
    pub base_price: i64,
    pub advantages: Vec<String>,
    pub is_active: bool,
}
