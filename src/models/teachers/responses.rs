use serde::Serialize;
use ts_rs::TS;

use crate::models::users::responses::UserResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct CreateTeacherResponse {
    pub teacher: UserResponse,
    pub schedules_created: usize,
    pub sessions_created: usize,
}
