use serde::Serialize;
use ts_rs::TS;

use super::entities::Course;
use crate::models::payments::entities::PaymentStatus;
use crate::scheduling::ScheduleEntry;

/// 带班次与排课摘要的课程视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub course: Course,
    pub batches: Vec<String>,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct MyCourseItem {
    pub id: i64,
    pub course: CourseResponse,
    pub purchased_at: Option<chrono::DateTime<chrono::Utc>>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseStudentCount {
    pub name: String,
    pub student_count: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct EnrollmentResponse {
    pub id: i64,
    pub course: String,
    pub batch: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
