use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => Self::STUDENT,
            UserRole::Teacher => Self::TEACHER,
            UserRole::Admin => Self::ADMIN,
        }
    }

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher]
    }
    pub fn learner_and_teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Teacher]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid role '{s}'. Supported roles: student, teacher, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::STUDENT => Ok(UserRole::Student),
            Self::TEACHER => Ok(UserRole::Teacher),
            Self::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.email_verified && self.phone_verified
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// "名 姓"，都为空时回退到用户名
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }

    /// 试用期剩余整天数，不小于 0
    pub fn remaining_trial_days(&self, now: DateTime<Utc>) -> i64 {
        self.trial_ends_at
            .map(|ends| (ends - now).num_seconds().max(0) / 86_400)
            .unwrap_or(0)
    }

    pub fn is_trial_active(&self, now: DateTime<Utc>) -> bool {
        self.trial_ends_at.is_some_and(|ends| ends > now)
    }
}

// 教师资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct TeacherProfile {
    pub qualification: String,
    pub experience_years: i32,
    pub specialization: Vec<String>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub teaching_languages: Vec<String>,
    pub is_verified: bool,
}

impl TeacherProfile {
    /// 新建教师时的空资料
    pub fn empty() -> Self {
        Self {
            qualification: String::new(),
            experience_years: 0,
            specialization: Vec::new(),
            bio: None,
            linkedin_url: None,
            teaching_languages: Vec::new(),
            is_verified: false,
        }
    }

    /// 校验管理员或教师本人填写的资料字段
    pub fn validate(&self) -> Result<(), String> {
        use crate::utils::validate::{validate_experience_years, validate_linkedin_url};

        let mut errors = Vec::new();
        if let Err(e) = validate_experience_years(self.experience_years) {
            errors.push(e.to_string());
        }
        if let Some(url) = self.linkedin_url.as_deref()
            && let Err(e) = validate_linkedin_url(url)
        {
            errors.push(e.to_string());
        }
        if self.specialization.iter().any(|s| s.trim().is_empty()) {
            errors.push("Specialization entries cannot be blank.".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join(" | "))
        }
    }
}

// 学生资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct StudentProfile {
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        let now = Utc::now();
        User {
            id: 1,
            username: "asha_1a2b3c".into(),
            email: "asha@example.com".into(),
            phone_number: None,
            password_hash: String::new(),
            first_name: first.into(),
            last_name: last.into(),
            role: UserRole::Student,
            status: UserStatus::Active,
            email_verified: true,
            phone_verified: false,
            trial_ends_at: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_name_fallback() {
        assert_eq!(user("Asha", "Rao").full_name(), "Asha Rao");
        assert_eq!(user("Asha", "").full_name(), "Asha");
        assert_eq!(user("", "").full_name(), "asha_1a2b3c");
    }

    #[test]
    fn test_verification_and_trial() {
        let now = Utc::now();
        let mut u = user("Asha", "Rao");
        assert!(!u.is_verified());
        assert_eq!(u.remaining_trial_days(now), 0);

        u.trial_ends_at = Some(now + chrono::Duration::hours(50));
        assert!(u.is_trial_active(now));
        assert_eq!(u.remaining_trial_days(now), 2);

        u.trial_ends_at = Some(now - chrono::Duration::days(1));
        assert!(!u.is_trial_active(now));
        assert_eq!(u.remaining_trial_days(now), 0);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("teacher".parse::<UserRole>(), Ok(UserRole::Teacher));
        assert!("user".parse::<UserRole>().is_err());
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(serde_json::to_string(&UserRole::Student).unwrap(), "\"student\"");
    }

    #[test]
    fn test_teacher_profile_validation() {
        let mut profile = TeacherProfile::empty();
        assert!(profile.validate().is_ok());
        profile.experience_years = 60;
        profile.linkedin_url = Some("https://example.com/me".into());
        assert_eq!(
            profile.validate().unwrap_err(),
            "Experience years must be between 0 and 50. | Enter a valid LinkedIn URL."
        );
    }
}
