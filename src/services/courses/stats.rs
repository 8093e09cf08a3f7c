use std::collections::{BTreeMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::PlatformError;
use crate::models::ApiResponse;
use crate::models::courses::responses::CourseStudentCount;
use crate::models::payments::entities::{PaymentStatus, Subscription};

/// 每门课程有效且已完成订阅的去重学生数
fn count_students(subscriptions: &[Subscription]) -> BTreeMap<i64, u64> {
    let mut students: BTreeMap<i64, HashSet<i64>> = BTreeMap::new();
    for sub in subscriptions
        .iter()
        .filter(|s| s.is_active && s.payment_status == PaymentStatus::Completed)
    {
        students.entry(sub.course_id).or_default().insert(sub.student_id);
    }
    students
        .into_iter()
        .map(|(course_id, ids)| (course_id, ids.len() as u64))
        .collect()
}

pub async fn course_student_counts(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let subscriptions = storage
        .list_subscriptions(None, Some(PaymentStatus::Completed))
        .await?;
    let counts = count_students(&subscriptions);

    let mut items = Vec::with_capacity(counts.len());
    for (course_id, student_count) in counts {
        if let Some(course) = storage.get_course_by_id(course_id).await? {
            items.push(CourseStudentCount {
                name: course.name,
                student_count,
            });
        }
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    if items.is_empty() {
        return Err(PlatformError::not_found("No courses found with enrolled students.").into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Student counts retrieved successfully",
    )))
}
