//! 课程视图：为课程附加班次列表与排课摘要
//!
//! 不同角色看到的班次范围不同，由 `ScheduleScope` 描述。

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::errors::{PlatformError, Result};
use crate::models::courses::entities::{ClassSchedule, ClassSession, Course};
use crate::models::courses::responses::CourseResponse;
use crate::scheduling::{BatchKind, summarize};
use crate::storage::Storage;

/// 参与汇总的班次范围
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleScope {
    /// 只看该教师的班次
    pub teacher_id: Option<i64>,
    /// 只看开课日期不早于该日的班次
    pub starting_from: Option<NaiveDate>,
    /// 只看该类型的班次
    pub batch: Option<BatchKind>,
}

impl ScheduleScope {
    fn admits(&self, schedule: &ClassSchedule) -> bool {
        self.teacher_id.is_none_or(|id| schedule.teacher_id == id)
            && self
                .starting_from
                .is_none_or(|day| schedule.batch_start_date >= day)
            && self.batch.is_none_or(|batch| schedule.batch == batch)
    }
}

/// 一门课程在给定范围内的班次（按开课日期排序）及其课时
#[derive(Default)]
pub(crate) struct CourseSchedules {
    schedules: Vec<(ClassSchedule, Vec<ClassSession>)>,
}

impl CourseSchedules {
    pub(crate) fn batches(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.schedules
            .iter()
            .map(|(schedule, _)| schedule.batch)
            .filter(|batch| seen.insert(*batch))
            .map(|batch| batch.to_string())
            .collect()
    }

    pub(crate) fn into_response(self, course: Course, batches: Vec<String>) -> CourseResponse {
        let schedule = self
            .schedules
            .iter()
            .flat_map(|(s, sessions)| {
                summarize(s.batch, s.batch_start_date, s.batch_end_date, sessions.as_slice())
            })
            .collect();
        CourseResponse {
            course,
            batches,
            schedule,
        }
    }
}

/// 批量加载课程的班次和课时，返回 course_id -> 班次
async fn load_schedules(
    storage: &dyn Storage,
    course_ids: &[i64],
    scope: ScheduleScope,
) -> Result<HashMap<i64, CourseSchedules>> {
    let wanted: HashSet<i64> = course_ids.iter().copied().collect();
    let mut schedules: Vec<ClassSchedule> = storage
        .list_schedules(None, scope.teacher_id)
        .await?
        .into_iter()
        .filter(|s| wanted.contains(&s.course_id) && scope.admits(s))
        .collect();
    schedules.sort_by_key(|s| (s.batch_start_date, s.id));

    let schedule_ids: Vec<i64> = schedules.iter().map(|s| s.id).collect();
    let mut sessions_by_schedule: HashMap<i64, Vec<ClassSession>> = HashMap::new();
    if !schedule_ids.is_empty() {
        for session in storage.list_sessions_for_schedules(&schedule_ids).await? {
            sessions_by_schedule
                .entry(session.schedule_id)
                .or_default()
                .push(session);
        }
    }

    let mut by_course: HashMap<i64, CourseSchedules> = HashMap::new();
    for schedule in schedules {
        let mut sessions = sessions_by_schedule.remove(&schedule.id).unwrap_or_default();
        sessions.sort_by_key(|s| (s.session_date, s.start_time));
        by_course
            .entry(schedule.course_id)
            .or_default()
            .schedules
            .push((schedule, sessions));
    }
    Ok(by_course)
}

/// 按范围构建课程视图，班次列表取范围内的全部班次
pub(crate) async fn course_views(
    storage: &dyn Storage,
    courses: Vec<Course>,
    scope: ScheduleScope,
) -> Result<Vec<CourseResponse>> {
    let ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
    let mut schedules = load_schedules(storage, &ids, scope).await?;

    Ok(courses
        .into_iter()
        .map(|course| {
            let entry = schedules.remove(&course.id).unwrap_or_default();
            let batches = entry.batches();
            entry.into_response(course, batches)
        })
        .collect())
}

pub(crate) async fn course_view(
    storage: &dyn Storage,
    course: Course,
    scope: ScheduleScope,
) -> Result<CourseResponse> {
    course_views(storage, vec![course], scope)
        .await?
        .pop()
        .ok_or_else(|| PlatformError::not_found("Course not found."))
}
