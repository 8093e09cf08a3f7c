use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 创建教师时提交的单门课程分配
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct CourseAssignment {
    pub course_id: i64,
    pub batches: Vec<String>,
    #[serde(default)]
    pub weekdays_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub weekdays_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub weekdays_days: Option<Vec<String>>,
    #[serde(default)]
    pub weekdays_start: Option<String>,
    #[serde(default)]
    pub weekdays_end: Option<String>,
    #[serde(default)]
    pub weekend_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub weekend_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub saturday_start: Option<String>,
    #[serde(default)]
    pub saturday_end: Option<String>,
    #[serde(default)]
    pub sunday_start: Option<String>,
    #[serde(default)]
    pub sunday_end: Option<String>,
}

impl CourseAssignment {
    /// 校验分配，错误信息以 `" | "` 连接
    pub fn validate(&self) -> Result<(), String> {
        super::plan_assignment(self).map(|_| ())
    }
}

/// 空字符串视为未填写
pub(super) fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
