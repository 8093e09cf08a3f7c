use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scheduling::{BatchKind, TimeSlot};

// 课程难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "course.ts")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for CourseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(CourseLevel::Beginner),
            "intermediate" => Ok(CourseLevel::Intermediate),
            "advanced" => Ok(CourseLevel::Advanced),
            _ => Err(format!("Invalid course level: {s}")),
        }
    }
}

// 课程实体，金额单位为分（paise）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// 搜索词在名称、简介、分类中的大小写不敏感匹配
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || [&self.name, &self.description, &self.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
    }

    pub fn matches_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CoursePricing {
    pub id: i64,
    pub course_id: i64,
    pub original_price: i64,
    pub discount_percent: i32,
    pub final_price: i64,
    pub created_at: DateTime<Utc>,
}

/// 折后价 = round(原价 × (100 − 折扣) / 100)，四舍五入
///
/// 乘积溢出时返回 `None`
pub fn discounted_price(original_price: i64, discount_percent: i32) -> Option<i64> {
    let numerator = original_price
        .checked_mul(i64::from(100 - discount_percent))?
        .checked_add(50)?;
    Some(numerator.div_euclid(100))
}

// 教师在某门课程上的一个班次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSchedule {
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub batch: BatchKind,
    pub batch_start_date: NaiveDate,
    pub batch_end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// 具体课时
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: i64,
    pub class_id: String,
    pub schedule_id: i64,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot for ClassSession {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            id: 1,
            name: "Data Science Bootcamp".into(),
            slug: "data-science-bootcamp".into(),
            description: "Pandas, NumPy and statistics".into(),
            category: "Analytics".into(),
            level: CourseLevel::Beginner,
            thumbnail: None,
            duration_hours: 40,
            base_price: 499_900,
            advantages: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_discounted_price_rounding() {
        assert_eq!(discounted_price(100_000, 0), Some(100_000));
        assert_eq!(discounted_price(100_000, 100), Some(0));
        assert_eq!(discounted_price(99_999, 15), Some(84_999));
        // 0.5 进位
        assert_eq!(discounted_price(10, 25), Some(8));
        assert_eq!(discounted_price(1, 50), Some(1));
    }

    #[test]
    fn test_discounted_price_overflow() {
        assert_eq!(discounted_price(100_000_000_000_000_000, 0), None);
        assert_eq!(discounted_price(i64::MAX, 100), Some(0));
        // 最大可计算的原价
        let max = (i64::MAX - 50) / 100;
        assert_eq!(discounted_price(max, 0), Some(max));
        assert_eq!(discounted_price(max + 1, 0), None);
    }

    #[test]
    fn test_search_and_category() {
        let c = course();
        assert!(c.matches_search("numpy"));
        assert!(c.matches_search("BOOTCAMP"));
        assert!(c.matches_search("analytics"));
        assert!(!c.matches_search("rust"));
        assert!(c.matches_category("analytics"));
        assert!(!c.matches_category("analytic"));
    }
}
