use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use super::{PlannedSession, format_clock};

/// 占用某一天某个时段的课时
pub trait TimeSlot {
    fn date(&self) -> NaiveDate;
    fn start(&self) -> NaiveTime;
    fn end(&self) -> NaiveTime;
}

impl TimeSlot for PlannedSession {
    fn date(&self) -> NaiveDate {
        self.session_date
    }
    fn start(&self) -> NaiveTime {
        self.start_time
    }
    fn end(&self) -> NaiveTime {
        self.end_time
    }
}

/// 同一天内两个时段是否重叠，首尾相接不算重叠
pub fn overlaps<A: TimeSlot + ?Sized, B: TimeSlot + ?Sized>(a: &A, b: &B) -> bool {
    a.date() == b.date() && !(a.end() <= b.start() || a.start() >= b.end())
}

/// 找出第一个与已有课时冲突的候选课时
pub fn find_conflict<'a, C: TimeSlot, E: TimeSlot>(
    candidates: &'a [C],
    existing: &[E],
) -> Option<&'a C> {
    let mut by_date: HashMap<NaiveDate, Vec<&E>> = HashMap::new();
    for slot in existing {
        by_date.entry(slot.date()).or_default().push(slot);
    }

    candidates.iter().find(|candidate| {
        by_date
            .get(&candidate.date())
            .is_some_and(|slots| slots.iter().any(|slot| overlaps(*candidate, *slot)))
    })
}

pub fn conflict_message<S: TimeSlot + ?Sized>(slot: &S) -> String {
    format!(
        "Schedule conflict on {} ({} - {})",
        slot.date().format("%Y-%m-%d"),
        format_clock(slot.start()),
        format_clock(slot.end())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: u32, start: (u32, u32), end: (u32, u32)) -> PlannedSession {
        PlannedSession {
            class_id: format!("{day}-{}", start.0),
            session_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn test_overlap_rules() {
        let base = slot(2, (9, 0), (10, 0));
        assert!(overlaps(&base, &slot(2, (9, 30), (10, 30))));
        assert!(overlaps(&base, &slot(2, (8, 0), (11, 0))));
        // 首尾相接
        assert!(!overlaps(&base, &slot(2, (10, 0), (11, 0))));
        assert!(!overlaps(&base, &slot(2, (8, 0), (9, 0))));
        // 不同日期
        assert!(!overlaps(&base, &slot(3, (9, 0), (10, 0))));
    }

    #[test]
    fn test_find_first_conflict() {
        let candidates = vec![
            slot(2, (9, 0), (10, 0)),
            slot(3, (9, 0), (10, 0)),
            slot(4, (9, 0), (10, 0)),
        ];
        let existing = vec![slot(4, (9, 45), (11, 0)), slot(3, (9, 30), (9, 45))];
        let hit = find_conflict(&candidates, &existing).unwrap();
        assert_eq!(hit.session_date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert_eq!(
            conflict_message(hit),
            "Schedule conflict on 2025-06-03 (09:00 AM - 10:00 AM)"
        );
    }

    #[test]
    fn test_no_conflict() {
        let candidates = vec![slot(2, (9, 0), (10, 0))];
        let existing = vec![slot(2, (10, 0), (11, 0)), slot(9, (9, 0), (10, 0))];
        assert!(find_conflict(&candidates, &existing).is_none());
        assert!(find_conflict::<PlannedSession, PlannedSession>(&candidates, &[]).is_none());
    }
}
