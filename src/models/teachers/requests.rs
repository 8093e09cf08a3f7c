use serde::Deserialize;
use ts_rs::TS;

use crate::scheduling::{CourseAssignment, PlannedSession, SchedulePlan};

// 管理员创建教师，附带课程分配
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct CreateTeacherRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub course_assignments: Vec<CourseAssignment>,
}

impl CreateTeacherRequest {
    /// 按第一个空格拆分为名和姓
    pub fn split_name(&self) -> (String, String) {
        match self.name.trim().split_once(' ') {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (self.name.trim().to_string(), String::new()),
        }
    }
}

/// 已通过校验与冲突检查、待写入的排期
#[derive(Debug, Clone)]
pub struct NewTeacherSchedule {
    pub plan: SchedulePlan,
    pub sessions: Vec<PlannedSession>,
}
