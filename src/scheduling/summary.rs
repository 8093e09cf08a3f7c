use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{BatchKind, TimeSlot, format_clock, weekday_name};

/// 课程详情中展示的一条排课信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "schedule.ts")]
pub struct ScheduleEntry {
    pub days: Vec<String>,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: BatchKind,
    pub batch_start_date: NaiveDate,
    pub batch_end_date: NaiveDate,
}

fn time_label<S: TimeSlot>(session: &S) -> String {
    format!(
        "{} to {}",
        format_clock(session.start()),
        format_clock(session.end())
    )
}

/// 汇总一个班次的课时
///
/// 工作日班合并为一条，时间取第一节课；周末班按 (星期, 时间) 去重，
/// 保留首次出现的顺序。`sessions` 需已按日期和开始时间排序，为空时返回空列表。
pub fn summarize<S: TimeSlot>(
    batch: BatchKind,
    batch_start_date: NaiveDate,
    batch_end_date: NaiveDate,
    sessions: &[S],
) -> Vec<ScheduleEntry> {
    let Some(first) = sessions.first() else {
        return Vec::new();
    };

    let entry = |days: Vec<String>, time: String| ScheduleEntry {
        days,
        time,
        kind: batch,
        batch_start_date,
        batch_end_date,
    };

    match batch {
        BatchKind::Weekdays => {
            let mut days: Vec<Weekday> = sessions.iter().map(|s| s.date().weekday()).collect();
            days.sort_by_key(|d| d.num_days_from_monday());
            days.dedup();
            vec![entry(
                days.into_iter().map(|d| weekday_name(d).to_string()).collect(),
                time_label(first),
            )]
        }
        BatchKind::Weekends => {
            let mut groups: Vec<(Weekday, String)> = Vec::new();
            for session in sessions {
                let key = (session.date().weekday(), time_label(session));
                if !groups.contains(&key) {
                    groups.push(key);
                }
            }
            groups
                .into_iter()
                .map(|(day, time)| entry(vec![weekday_name(day).to_string()], time))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::PlannedSession;
    use chrono::NaiveTime;

    fn session(day: u32, start: u32, end: u32) -> PlannedSession {
        PlannedSession {
            class_id: String::new(),
            session_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        )
    }

    #[test]
    fn test_weekdays_single_entry_in_weekday_order() {
        let (start, end) = range();
        // 周三、周一、周五
        let sessions = vec![session(4, 18, 19), session(9, 18, 19), session(13, 18, 19)];
        let entries = summarize(BatchKind::Weekdays, start, end, &sessions);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].days, vec!["Monday", "Wednesday", "Friday"]);
        assert_eq!(entries[0].time, "06:00 PM to 07:00 PM");
        assert_eq!(entries[0].kind, BatchKind::Weekdays);
    }

    #[test]
    fn test_weekends_grouped_by_day_and_time() {
        let (start, end) = range();
        let sessions = vec![
            session(7, 10, 12),
            session(8, 14, 16),
            session(14, 10, 12),
            session(15, 14, 16),
        ];
        let entries = summarize(BatchKind::Weekends, start, end, &sessions);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].days, vec!["Saturday"]);
        assert_eq!(entries[0].time, "10:00 AM to 12:00 PM");
        assert_eq!(entries[1].days, vec!["Sunday"]);
        assert_eq!(entries[1].time, "02:00 PM to 04:00 PM");
    }

    #[test]
    fn test_empty_sessions_omitted() {
        let (start, end) = range();
        assert!(summarize::<PlannedSession>(BatchKind::Weekends, start, end, &[]).is_empty());
    }

    #[test]
    fn test_entry_serialization_keys() {
        let (start, end) = range();
        let entries = summarize(BatchKind::Weekdays, start, end, &[session(2, 9, 10)]);
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["type"], "weekdays");
        assert_eq!(json["batchStartDate"], "2025-06-02");
        assert_eq!(json["batchEndDate"], "2025-06-15");
        assert_eq!(json["days"][0], "Monday");
    }
}
