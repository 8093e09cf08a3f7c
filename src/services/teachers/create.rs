use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use super::TeacherService;
use crate::errors::PlatformError;
use crate::models::teachers::requests::{CreateTeacherRequest, NewTeacherSchedule};
use crate::models::teachers::responses::CreateTeacherResponse;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::NewUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::notifications::templates::{self, AssignedCourse};
use crate::notifications::Notifier;
use crate::scheduling::{PlannedSession, conflict_message, find_conflict, plan_assignment, summarize};
use crate::services::auth::profile::user_response;
use crate::services::{error_response, shared};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_hex;
use crate::utils::validate::{validate_email, validate_password, validate_phone};

const USERNAME_ATTEMPTS: usize = 5;

/// 用户名前缀：名字转小写，去掉空白与分隔符
fn username_base(first_name: &str) -> String {
    let base: String = first_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '_' | '-' | '.'))
        .collect();
    if base.is_empty() { "teacher".to_string() } else { base }
}

/// 用户名形如 `ravi_3fa9c1`，冲突时重新生成
async fn unique_username(storage: &dyn Storage, first_name: &str) -> Result<String, PlatformError> {
    let base = username_base(first_name);

    for _ in 0..USERNAME_ATTEMPTS {
        let candidate = format!("{}_{}", base, generate_hex(6));
        if storage.get_user_by_username(&candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(PlatformError::conflict("Could not generate a unique username."))
}

pub async fn handle_create_teacher(
    service: &TeacherService,
    create_request: CreateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 基本字段
    if create_request.name.trim().is_empty() {
        return Err(PlatformError::validation("Name is required and cannot be blank.").into());
    }

    let email = create_request.email.trim();
    if email.is_empty() {
        return Err(PlatformError::validation("Email is required and cannot be blank.").into());
    }
    validate_email(email).map_err(PlatformError::validation)?;
    if storage.get_user_by_email(email).await?.is_some() {
        return Err(PlatformError::conflict("Email is already in use.").into());
    }

    let phone = create_request.phone.trim();
    validate_phone(phone).map_err(PlatformError::validation)?;
    if storage.get_user_by_phone(phone).await?.is_some() {
        return Err(PlatformError::conflict("Phone number is already in use.").into());
    }

    validate_password(&create_request.password).map_err(PlatformError::validation)?;
    if create_request.password != create_request.confirm_password {
        return Err(PlatformError::validation("Passwords do not match.").into());
    }

    let mut seen = HashSet::new();
    if !create_request
        .course_assignments
        .iter()
        .all(|a| seen.insert(a.course_id))
    {
        return Err(
            PlatformError::validation("Duplicate course assignments are not allowed.").into(),
        );
    }

    // 2. 逐个分配生成计划并检查冲突
    let mut schedules: Vec<NewTeacherSchedule> = Vec::new();
    let mut planned: Vec<PlannedSession> = Vec::new();
    let mut assigned: Vec<AssignedCourse> = Vec::new();

    for assignment in &create_request.course_assignments {
        let plans = plan_assignment(assignment).map_err(PlatformError::validation)?;

        let course = storage
            .get_course_by_id(assignment.course_id)
            .await?
            .filter(|c| c.is_active);
        let Some(course) = course else {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::CourseNotFound,
                format!("Course with ID {} not found or inactive.", assignment.course_id),
            ));
        };

        let mut course_schedule = Vec::new();
        for plan in plans {
            let sessions = plan.expand();
            if let Some(slot) = find_conflict(&sessions, &planned) {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ScheduleConflict,
                    conflict_message(slot),
                ));
            }
            course_schedule.extend(summarize(
                plan.batch,
                plan.start_date,
                plan.end_date,
                sessions.as_slice(),
            ));
            planned.extend(sessions.iter().cloned());
            schedules.push(NewTeacherSchedule { plan, sessions });
        }

        assigned.push(AssignedCourse {
            course_name: course.name,
            schedule: course_schedule,
        });
    }

    // 3. 单个事务写入教师、资料、排期和课时
    let (first_name, last_name) = create_request.split_name();
    let username = unique_username(storage.as_ref(), &first_name).await?;

    let (teacher, schedules_created, sessions_created) = storage
        .create_teacher_with_schedules(
            NewUser {
                username,
                email: email.to_string(),
                phone_number: Some(phone.to_string()),
                password_hash: hash_password(&create_request.password)?,
                first_name,
                last_name,
                role: UserRole::Teacher,
                status: UserStatus::Active,
                email_verified: true,
                phone_verified: true,
                trial_ends_at: None,
            },
            schedules,
        )
        .await?;

    info!(
        "Teacher {} created with {} schedules and {} sessions",
        teacher.username, schedules_created, sessions_created
    );

    // 4. 提交后发送账号邮件，失败只记录
    let message = templates::teacher_credentials_email(
        &service.get_config().app.system_name,
        &teacher.full_name(),
        &teacher.email,
        &teacher.username,
        &create_request.password,
        &assigned,
    );
    match shared::<dyn Notifier>(request, "Notifier") {
        Ok(notifier) => {
            if let Err(e) = notifier.send_email(message).await {
                error!("Failed to send teacher credentials email: {}", e);
            }
        }
        Err(e) => error!("Failed to send teacher credentials email: {}", e),
    }

    let teacher = user_response(storage.as_ref(), teacher).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateTeacherResponse {
            teacher,
            schedules_created,
            sessions_created,
        },
        "Teacher created successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::CourseAssignment;
    use crate::services::test_support::{TestApp, body_json, status_of};
    use crate::storage::sea_orm_storage::test_support::new_course;
    use chrono::NaiveDate;

    fn date(value: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap())
    }

    fn weekdays(course_id: i64, days: &[&str], start: &str, end: &str) -> CourseAssignment {
        CourseAssignment {
            course_id,
            batches: vec!["weekdays".into()],
            weekdays_start_date: date("2026-01-05"),
            weekdays_end_date: date("2026-01-09"),
            weekdays_days: Some(days.iter().map(|d| d.to_string()).collect()),
            weekdays_start: Some(start.into()),
            weekdays_end: Some(end.into()),
            ..Default::default()
        }
    }

    fn request(assignments: Vec<CourseAssignment>) -> CreateTeacherRequest {
        CreateTeacherRequest {
            name: "Ravi Kumar".into(),
            email: "ravi@example.com".into(),
            phone: "9876500001".into(),
            password: "password123".into(),
            confirm_password: "password123".into(),
            course_assignments: assignments,
        }
    }

    #[actix_web::test]
    async fn test_create_teacher_with_schedules() {
        let app = TestApp::new().await;
        let admin = app.user("admin", "9000000031", UserRole::Admin).await;
        let rust = app.storage.create_course(new_course("Rust")).await.unwrap();
        let go = app.storage.create_course(new_course("Go")).await.unwrap();

        let mut first = weekdays(rust.id, &["Monday", "Wednesday"], "09:00 AM", "10:00 AM");
        first.batches.push("weekends".into());
        first.weekend_start_date = date("2026-01-10");
        first.weekend_end_date = date("2026-01-11");
        first.saturday_start = Some("10:00 AM".into());
        first.saturday_end = Some("12:00 PM".into());
        let second = weekdays(go.id, &["Tuesday"], "09:00 AM", "10:00 AM");

        let result = TeacherService::new_lazy()
            .create_teacher(request(vec![first, second]), &app.request(Some(&admin)))
            .await;
        assert_eq!(status_of(&result), StatusCode::CREATED);
        let body = body_json(result).await;
        assert_eq!(body["data"]["schedules_created"], 3);
        assert_eq!(body["data"]["sessions_created"], 4);
        let username = body["data"]["teacher"]["username"].as_str().unwrap().to_string();
        assert!(username.starts_with("ravi_"));
        assert_eq!(username.len(), "ravi_".len() + 6);

        let teacher = app.storage.get_user_by_username(&username).await.unwrap().unwrap();
        assert_eq!(teacher.role, UserRole::Teacher);
        assert_eq!(teacher.last_name, "Kumar");
        assert!(app.storage.get_teacher_profile(teacher.id).await.unwrap().is_some());

        let emails = app.notifier.emails.lock().unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to, "ravi@example.com");
        assert!(emails[0].text_body.contains(&username));
        assert!(emails[0].text_body.contains("Rust"));
    }

    #[test]
    fn test_username_base_keeps_non_latin_names() {
        assert_eq!(username_base("Ravi"), "ravi");
        assert_eq!(username_base("Ангелина"), "ангелина");
        assert_eq!(username_base("Zoë"), "zoë");
        assert_eq!(username_base("रवि"), "रवि");
        assert_eq!(username_base("Mary-Jane"), "maryjane");
        assert_eq!(username_base("__"), "teacher");
    }

    #[actix_web::test]
    async fn test_non_latin_name_and_long_batch() {
        let app = TestApp::new().await;
        let admin = app.user("admin", "9000000034", UserRole::Admin).await;
        let rust = app.storage.create_course(new_course("Rust")).await.unwrap();

        let mut assignment = weekdays(
            rust.id,
            &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
            "09:00 AM",
            "10:00 AM",
        );
        assignment.weekdays_end_date = date("2056-01-05");
        let mut create = request(vec![assignment]);
        create.name = "Ангелина Петрова".into();

        let result = TeacherService::new_lazy()
            .create_teacher(create, &app.request(Some(&admin)))
            .await;
        assert_eq!(status_of(&result), StatusCode::CREATED);
        let body = body_json(result).await;
        assert_eq!(body["data"]["sessions_created"], 7828);
        let username = body["data"]["teacher"]["username"].as_str().unwrap();
        assert!(username.starts_with("ангелина_"));
    }

    #[actix_web::test]
    async fn test_conflicting_assignments_are_rejected() {
        let app = TestApp::new().await;
        let admin = app.user("admin", "9000000032", UserRole::Admin).await;
        let rust = app.storage.create_course(new_course("Rust")).await.unwrap();
        let go = app.storage.create_course(new_course("Go")).await.unwrap();

        let result = TeacherService::new_lazy()
            .create_teacher(
                request(vec![
                    weekdays(rust.id, &["Monday", "Wednesday"], "09:00 AM", "10:00 AM"),
                    weekdays(go.id, &["Wednesday"], "09:30 AM", "10:30 AM"),
                ]),
                &app.request(Some(&admin)),
            )
            .await;
        assert_eq!(status_of(&result), StatusCode::BAD_REQUEST);
        let message = body_json(result).await["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("Schedule conflict on 2026-01-07"));
        assert!(app.storage.get_user_by_email("ravi@example.com").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_request_level_rules() {
        let app = TestApp::new().await;
        let admin = app.user("admin", "9000000033", UserRole::Admin).await;
        let rust = app.storage.create_course(new_course("Rust")).await.unwrap();
        let req = app.request(Some(&admin));
        let service = TeacherService::new_lazy();

        let duplicate = service
            .create_teacher(
                request(vec![
                    weekdays(rust.id, &["Monday"], "09:00 AM", "10:00 AM"),
                    weekdays(rust.id, &["Tuesday"], "09:00 AM", "10:00 AM"),
                ]),
                &req,
            )
            .await;
        assert_eq!(
            body_json(duplicate).await["message"],
            "Duplicate course assignments are not allowed."
        );

        let missing = service
            .create_teacher(
                request(vec![weekdays(rust.id + 50, &["Monday"], "09:00 AM", "10:00 AM")]),
                &req,
            )
            .await;
        assert_eq!(
            body_json(missing).await["message"],
            format!("Course with ID {} not found or inactive.", rust.id + 50)
        );

        let mut taken = request(vec![]);
        taken.email = "admin@example.com".into();
        let taken = service.create_teacher(taken, &req).await;
        assert_eq!(status_of(&taken), StatusCode::CONFLICT);

        let mut mismatch = request(vec![]);
        mismatch.confirm_password = "different123".into();
        let mismatch = service.create_teacher(mismatch, &req).await;
        assert_eq!(status_of(&mismatch), StatusCode::BAD_REQUEST);
    }
}
