use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::UserService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::payments::entities::PaymentStatus;
use crate::models::users::entities::UserRole;
use crate::models::users::responses::{
    NotEnrolledStudentItem, StudentListItem, TeacherListItem, TrialStatus,
};
use crate::storage::Storage;

/// 保持首次出现顺序去重
fn unique_in_order<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

async fn course_names(storage: &dyn Storage) -> Result<HashMap<i64, String>> {
    Ok(storage
        .list_courses(false)
        .await?
        .into_iter()
        .map(|course| (course.id, course.name))
        .collect())
}

pub async fn list_teachers(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let teachers = storage.list_users_by_role(UserRole::Teacher).await?;
    let names = course_names(storage.as_ref()).await?;
    let mut schedules_by_teacher: HashMap<i64, Vec<_>> = HashMap::new();
    for schedule in storage.list_schedules(None, None).await? {
        schedules_by_teacher
            .entry(schedule.teacher_id)
            .or_default()
            .push(schedule);
    }

    let items: Vec<TeacherListItem> = teachers
        .into_iter()
        .map(|teacher| {
            let schedules = schedules_by_teacher.remove(&teacher.id).unwrap_or_default();
            TeacherListItem {
                id: teacher.id,
                name: teacher.full_name(),
                email: teacher.email.clone(),
                phone: teacher.phone_number.clone(),
                course_assigned: schedules
                    .iter()
                    .filter_map(|s| names.get(&s.course_id).cloned())
                    .collect(),
                batches: unique_in_order(schedules.iter().map(|s| s.batch.to_string())),
                status: teacher.is_active(),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Teachers retrieved successfully",
    )))
}

pub async fn list_students(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let students = storage.list_users_by_role(UserRole::Student).await?;
    let names = course_names(storage.as_ref()).await?;
    let mut enrollments_by_student: HashMap<i64, Vec<_>> = HashMap::new();
    for enrollment in storage.list_enrollments(None).await? {
        enrollments_by_student
            .entry(enrollment.student_id)
            .or_default()
            .push(enrollment);
    }

    let items: Vec<StudentListItem> = students
        .into_iter()
        .map(|student| {
            let enrollments = enrollments_by_student
                .remove(&student.id)
                .unwrap_or_default();
            StudentListItem {
                id: student.id,
                name: student.full_name(),
                email: student.email.clone(),
                phone: student.phone_number.clone(),
                enrolled_courses: enrollments
                    .iter()
                    .filter_map(|e| names.get(&e.course_id).cloned())
                    .collect(),
                batches: unique_in_order(enrollments.iter().map(|e| e.batch.to_string())),
                registration_date: student.created_at.format("%Y-%m-%d %H:%M").to_string(),
                status: if student.is_active() { "Active" } else { "Inactive" }.to_string(),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Students retrieved successfully",
    )))
}

pub async fn list_students_not_enrolled(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let now = Utc::now();

    let enrolled: HashSet<i64> = storage
        .list_subscriptions(None, Some(PaymentStatus::Completed))
        .await?
        .into_iter()
        .map(|s| s.student_id)
        .collect();

    let items: Vec<NotEnrolledStudentItem> = storage
        .list_users_by_role(UserRole::Student)
        .await?
        .into_iter()
        .filter(|student| !enrolled.contains(&student.id))
        .map(|student| NotEnrolledStudentItem {
            id: student.id,
            name: student.full_name(),
            remaining_days: student.remaining_trial_days(now),
            status: if student.is_trial_active(now) {
                TrialStatus::TrialActive
            } else {
                TrialStatus::TrialExpired
            },
            email: student.email,
            phone_number: student.phone_number,
            registration_date_time: student.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Students without enrollment retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::entities::NewSubscription;
    use crate::scheduling::BatchKind;
    use crate::services::test_support::{TestApp, body_json};
    use crate::storage::sea_orm_storage::test_support::new_course;

    #[test]
    fn test_unique_in_order() {
        let items = ["weekends", "weekdays", "weekends"].map(String::from);
        assert_eq!(unique_in_order(items), vec!["weekends", "weekdays"]);
    }

    #[actix_web::test]
    async fn test_students_with_and_without_completed_purchase() {
        let app = TestApp::new().await;
        let paid = app.user("paid", "9000000001", UserRole::Student).await;
        app.user("trial", "9000000002", UserRole::Student).await;
        let course = app.storage.create_course(new_course("Rust Basics")).await.unwrap();

        let sub = app
            .storage
            .create_subscription(NewSubscription {
                student_id: paid.id,
                course_id: course.id,
                amount_paid: course.base_price,
                currency: "INR".into(),
                order_id: "order_1".into(),
                payment_method: "razorpay".into(),
            })
            .await
            .unwrap();
        app.storage
            .upsert_enrollment(paid.id, course.id, sub.id, BatchKind::Weekends)
            .await
            .unwrap();
        app.storage
            .complete_subscription(sub.id, "pay_1", serde_json::json!({}))
            .await
            .unwrap();

        let req = app.request(None);
        let service = UserService::new_lazy();

        let students = body_json(service.list_students(&req).await).await;
        let paid_row = students["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|row| row["email"] == "paid@example.com")
            .unwrap()
            .clone();
        assert_eq!(paid_row["enrolled_courses"][0], "Rust Basics");
        assert_eq!(paid_row["batches"][0], "weekends");
        assert_eq!(paid_row["status"], "Active");

        let not_enrolled = body_json(service.list_students_not_enrolled(&req).await).await;
        let rows = not_enrolled["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["email"], "trial@example.com");
        assert_eq!(rows[0]["remaining_days"], 0);
        assert_eq!(rows[0]["status"], "trial_expired");
    }
}
