//! 排课引擎
//!
//! 把教师的课程分配（工作日/周末班次 + 日期范围 + 时段）展开为具体课时，
//! 并检测与教师已有课时的时间冲突。本模块不访问数据库。

mod assignment;
mod clock;
mod conflict;
mod plan;
mod summary;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use assignment::CourseAssignment;
pub use clock::{format_clock, parse_clock};
pub use conflict::{TimeSlot, conflict_message, find_conflict, overlaps};
pub use plan::{PlannedSession, SchedulePlan, SlotRule, plan_assignment};
pub use summary::{ScheduleEntry, summarize};

/// 班次类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "schedule.ts")]
pub enum BatchKind {
    Weekdays,
    Weekends,
}

impl BatchKind {
    pub const WEEKDAYS: &'static str = "weekdays";
    pub const WEEKENDS: &'static str = "weekends";

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchKind::Weekdays => Self::WEEKDAYS,
            BatchKind::Weekends => Self::WEEKENDS,
        }
    }
}

impl std::fmt::Display for BatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::WEEKDAYS => Ok(BatchKind::Weekdays),
            Self::WEEKENDS => Ok(BatchKind::Weekends),
            _ => Err(format!("Invalid batch: {s}")),
        }
    }
}

pub(crate) const WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// 英文全称，与请求中的 `weekdays_days` 取值一致
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) fn working_day_from_name(name: &str) -> Option<Weekday> {
    WORKING_DAYS
        .iter()
        .copied()
        .find(|day| weekday_name(*day) == name)
}
