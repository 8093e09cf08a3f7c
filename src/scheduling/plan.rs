use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use super::assignment::{CourseAssignment, present};
use super::{BatchKind, WORKING_DAYS, parse_clock, weekday_name, working_day_from_name};

/// 一条时段规则：在 `days` 中的每一天，从 `start` 上到 `end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRule {
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// 单个班次的排课计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    pub course_id: i64,
    pub batch: BatchKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rules: Vec<SlotRule>,
}

/// 展开后尚未入库的课时
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSession {
    pub class_id: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SchedulePlan {
    /// 展开为具体课时，按日期、开始时间排序
    pub fn expand(&self) -> Vec<PlannedSession> {
        let mut sessions: Vec<PlannedSession> = self
            .start_date
            .iter_days()
            .take_while(|date| *date <= self.end_date)
            .flat_map(|date| {
                self.rules
                    .iter()
                    .filter(move |rule| rule.days.contains(&date.weekday()))
                    .map(move |rule| PlannedSession {
                        class_id: uuid::Uuid::new_v4().to_string(),
                        session_date: date,
                        start_time: rule.start,
                        end_time: rule.end,
                    })
            })
            .collect();
        sessions.sort_by_key(|s| (s.session_date, s.start_time));
        sessions
    }
}

/// 收集 `字段: 信息` 形式的校验错误
#[derive(Default)]
struct Errors(Vec<String>);

impl Errors {
    fn push(&mut self, field: &str, message: impl AsRef<str>) {
        self.0.push(format!("{field}: {}", message.as_ref()));
    }

    fn require<T>(&mut self, field: &str, value: Option<T>, batch: &str) -> Option<T> {
        if value.is_none() {
            self.push(field, format!("This field is required for '{batch}' batch."));
        }
        value
    }

    fn time(&mut self, field: &str, value: Option<&str>) -> Option<NaiveTime> {
        match value.map(parse_clock)? {
            Ok(time) => Some(time),
            Err(e) => {
                self.push(field, e);
                None
            }
        }
    }

    fn date_range(
        &mut self,
        end_field: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let (start, end) = (start?, end?);
        if start > end {
            self.push(end_field, "End date must be after start date.");
            return None;
        }
        Some((start, end))
    }

    fn time_range(
        &mut self,
        end_field: &str,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Option<(NaiveTime, NaiveTime)> {
        let (start, end) = (start?, end?);
        if end <= start {
            self.push(end_field, "End time must be after start time.");
            return None;
        }
        Some((start, end))
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, String> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(self.0.join(" | ")),
        }
    }
}

fn parse_batches(batches: &[String]) -> Result<Vec<BatchKind>, String> {
    if batches.is_empty() {
        return Err("batches: This list may not be empty.".to_string());
    }

    let mut errors = Vec::new();
    let kinds: Vec<BatchKind> = batches.iter().filter_map(|b| b.parse().ok()).collect();
    if kinds.len() != batches.len() {
        errors.push(format!(
            "batches: Must be one or more of: {}, {}.",
            BatchKind::WEEKDAYS,
            BatchKind::WEEKENDS
        ));
    }
    let unique: HashSet<&String> = batches.iter().collect();
    if unique.len() != batches.len() {
        errors.push(
            "batches: Duplicate batches are not allowed in the same assignment.".to_string(),
        );
    }
    if batches.len() > 2 {
        errors.push(
            "batches: At most two batches (weekdays, weekends) can be assigned per course."
                .to_string(),
        );
    }

    if errors.is_empty() {
        Ok(kinds)
    } else {
        Err(errors.join(" | "))
    }
}

fn plan_weekdays(a: &CourseAssignment, errors: &mut Errors) -> Option<SchedulePlan> {
    let batch = BatchKind::WEEKDAYS;
    let start_date = errors.require("weekdays_start_date", a.weekdays_start_date, batch);
    let end_date = errors.require("weekdays_end_date", a.weekdays_end_date, batch);
    let start = errors.require("weekdays_start", present(&a.weekdays_start), batch);
    let end = errors.require("weekdays_end", present(&a.weekdays_end), batch);

    let dates = errors.date_range("weekdays_end_date", start_date, end_date);

    let days = match a.weekdays_days.as_deref() {
        None | Some([]) => Some(WORKING_DAYS.to_vec()),
        Some(names) => {
            let invalid: Vec<String> = names
                .iter()
                .filter(|name| working_day_from_name(name).is_none())
                .map(|name| format!("'{name}'"))
                .collect();
            if invalid.is_empty() {
                let mut days: Vec<Weekday> =
                    names.iter().filter_map(|n| working_day_from_name(n)).collect();
                days.sort_by_key(|d| d.num_days_from_monday());
                days.dedup();
                Some(days)
            } else {
                let valid: Vec<&str> = WORKING_DAYS.iter().map(|d| weekday_name(*d)).collect();
                errors.push(
                    "weekdays_days",
                    format!(
                        "Invalid days [{}]. Must be from: {}.",
                        invalid.join(", "),
                        valid.join(", ")
                    ),
                );
                None
            }
        }
    };

    let start = errors.time("weekdays_start", start);
    let end = errors.time("weekdays_end", end);
    let times = errors.time_range("weekdays_end", start, end);

    let (start_date, end_date) = dates?;
    let (start, end) = times?;
    Some(SchedulePlan {
        course_id: a.course_id,
        batch: BatchKind::Weekdays,
        start_date,
        end_date,
        rules: vec![SlotRule {
            days: days?,
            start,
            end,
        }],
    })
}

fn plan_weekends(a: &CourseAssignment, errors: &mut Errors) -> Option<SchedulePlan> {
    let batch = BatchKind::WEEKENDS;
    let start_date = errors.require("weekend_start_date", a.weekend_start_date, batch);
    let end_date = errors.require("weekend_end_date", a.weekend_end_date, batch);
    let dates = errors.date_range("weekend_end_date", start_date, end_date);

    let pairs = [
        (
            Weekday::Sat,
            present(&a.saturday_start),
            present(&a.saturday_end),
            "saturday_start",
            "saturday_end",
        ),
        (
            Weekday::Sun,
            present(&a.sunday_start),
            present(&a.sunday_end),
            "sunday_start",
            "sunday_end",
        ),
    ];

    let mut rules = Vec::new();
    let mut provided = false;
    let mut valid = true;
    for (day, start, end, start_field, end_field) in pairs {
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        provided = true;
        let start = errors.time(start_field, Some(start));
        let end = errors.time(end_field, Some(end));
        match errors.time_range(end_field, start, end) {
            Some((start, end)) => rules.push(SlotRule {
                days: vec![day],
                start,
                end,
            }),
            None => valid = false,
        }
    }
    if !provided {
        errors.push(
            "weekend_times",
            "At least Saturday or Sunday timings must be provided.",
        );
        return None;
    }

    let (start_date, end_date) = dates?;
    valid.then_some(SchedulePlan {
        course_id: a.course_id,
        batch: BatchKind::Weekends,
        start_date,
        end_date,
        rules,
    })
}

/// 校验课程分配并生成各班次的排课计划（工作日班在前）
pub fn plan_assignment(assignment: &CourseAssignment) -> Result<Vec<SchedulePlan>, String> {
    let kinds = parse_batches(&assignment.batches)?;

    let mut errors = Errors::default();
    let mut plans = Vec::with_capacity(kinds.len());
    let mut complete = true;

    for kind in [BatchKind::Weekdays, BatchKind::Weekends] {
        if !kinds.contains(&kind) {
            continue;
        }
        let plan = match kind {
            BatchKind::Weekdays => plan_weekdays(assignment, &mut errors),
            BatchKind::Weekends => plan_weekends(assignment, &mut errors),
        };
        match plan {
            Some(plan) => plans.push(plan),
            None => complete = false,
        }
    }

    errors.into_result(complete.then_some(plans))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekdays_assignment() -> CourseAssignment {
        CourseAssignment {
            course_id: 7,
            batches: vec!["weekdays".into()],
            // 2025-06-02 是周一
            weekdays_start_date: Some(date(2025, 6, 2)),
            weekdays_end_date: Some(date(2025, 6, 8)),
            weekdays_start: Some("09:00 AM".into()),
            weekdays_end: Some("10:00 AM".into()),
            ..Default::default()
        }
    }

    fn weekends_assignment() -> CourseAssignment {
        CourseAssignment {
            course_id: 7,
            batches: vec!["weekends".into()],
            weekend_start_date: Some(date(2025, 6, 7)),
            weekend_end_date: Some(date(2025, 6, 15)),
            saturday_start: Some("10:00 AM".into()),
            saturday_end: Some("12:00 PM".into()),
            sunday_start: Some("02:00 PM".into()),
            sunday_end: Some("04:00 PM".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_weekdays_default_days_expand() {
        let plans = plan_assignment(&weekdays_assignment()).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].batch, BatchKind::Weekdays);
        assert_eq!(plans[0].rules[0].days, WORKING_DAYS.to_vec());

        let sessions = plans[0].expand();
        assert_eq!(sessions.len(), 5);
        assert_eq!(sessions[0].session_date, date(2025, 6, 2));
        assert_eq!(sessions[4].session_date, date(2025, 6, 6));
        assert!(
            sessions
                .iter()
                .all(|s| s.start_time == NaiveTime::from_hms_opt(9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_weekdays_selected_days() {
        let mut a = weekdays_assignment();
        a.weekdays_days = Some(vec!["Wednesday".into(), "Monday".into()]);
        let sessions = plan_assignment(&a).unwrap()[0].expand();
        let dates: Vec<NaiveDate> = sessions.iter().map(|s| s.session_date).collect();
        assert_eq!(dates, vec![date(2025, 6, 2), date(2025, 6, 4)]);
    }

    #[test]
    fn test_weekends_one_rule_per_day_sorted() {
        let plans = plan_assignment(&weekends_assignment()).unwrap();
        assert_eq!(plans[0].rules.len(), 2);
        let sessions = plans[0].expand();
        let dates: Vec<NaiveDate> = sessions.iter().map(|s| s.session_date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 6, 7),
                date(2025, 6, 8),
                date(2025, 6, 14),
                date(2025, 6, 15)
            ]
        );
    }

    #[test]
    fn test_class_ids_are_unique() {
        let sessions = plan_assignment(&weekdays_assignment()).unwrap()[0].expand();
        let ids: HashSet<&str> = sessions.iter().map(|s| s.class_id.as_str()).collect();
        assert_eq!(ids.len(), sessions.len());
    }

    #[test]
    fn test_both_batches_weekdays_first() {
        let mut a = weekends_assignment();
        let w = weekdays_assignment();
        a.batches = vec!["weekends".into(), "weekdays".into()];
        a.weekdays_start_date = w.weekdays_start_date;
        a.weekdays_end_date = w.weekdays_end_date;
        a.weekdays_start = w.weekdays_start;
        a.weekdays_end = w.weekdays_end;
        let plans = plan_assignment(&a).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].batch, BatchKind::Weekdays);
        assert_eq!(plans[1].batch, BatchKind::Weekends);
    }

    #[test]
    fn test_batch_errors() {
        let mut a = weekdays_assignment();
        a.batches = vec![];
        assert_eq!(
            plan_assignment(&a).unwrap_err(),
            "batches: This list may not be empty."
        );

        a.batches = vec!["weekdays".into(), "weekdays".into(), "evenings".into()];
        assert_eq!(
            plan_assignment(&a).unwrap_err(),
            "batches: Must be one or more of: weekdays, weekends. | \
             batches: Duplicate batches are not allowed in the same assignment. | \
             batches: At most two batches (weekdays, weekends) can be assigned per course."
        );
    }

    #[test]
    fn test_missing_fields_are_joined() {
        let a = CourseAssignment {
            course_id: 1,
            batches: vec!["weekdays".into()],
            weekdays_start: Some("09:00 AM".into()),
            ..Default::default()
        };
        assert_eq!(
            plan_assignment(&a).unwrap_err(),
            "weekdays_start_date: This field is required for 'weekdays' batch. | \
             weekdays_end_date: This field is required for 'weekdays' batch. | \
             weekdays_end: This field is required for 'weekdays' batch."
        );
    }

    #[test]
    fn test_date_and_time_order() {
        let mut a = weekdays_assignment();
        a.weekdays_start_date = Some(date(2025, 6, 9));
        a.weekdays_end = Some("08:00 AM".into());
        assert_eq!(
            plan_assignment(&a).unwrap_err(),
            "weekdays_end_date: End date must be after start date. | \
             weekdays_end: End time must be after start time."
        );
    }

    #[test]
    fn test_invalid_weekday_names() {
        let mut a = weekdays_assignment();
        a.weekdays_days = Some(vec!["Monday".into(), "Saturday".into()]);
        assert_eq!(
            plan_assignment(&a).unwrap_err(),
            "weekdays_days: Invalid days ['Saturday']. Must be from: \
             Monday, Tuesday, Wednesday, Thursday, Friday."
        );
    }

    #[test]
    fn test_weekend_requires_a_timing() {
        let mut a = weekends_assignment();
        a.saturday_start = None;
        a.sunday_end = Some(" ".into());
        assert_eq!(
            plan_assignment(&a).unwrap_err(),
            "weekend_times: At least Saturday or Sunday timings must be provided."
        );
    }

    #[test]
    fn test_bad_clock_value() {
        let mut a = weekends_assignment();
        a.sunday_start = Some("2 PM".into());
        let err = plan_assignment(&a).unwrap_err();
        assert!(err.starts_with("sunday_start: Invalid time '2 PM'"));
    }

    #[test]
    fn test_validate_wrapper() {
        assert!(weekdays_assignment().validate().is_ok());
        let mut a = weekdays_assignment();
        a.weekdays_end_date = None;
        assert!(a.validate().is_err());
    }
}
