use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::{PlatformError, Result};
use crate::models::ApiResponse;
use crate::models::courses::entities::Course;
use crate::models::courses::requests::UpdateEnrollmentRequest;
use crate::models::courses::responses::EnrollmentResponse;
use crate::scheduling::BatchKind;
use crate::services::current_user;
use crate::storage::Storage;

/// 班次必须是该课程已排期的班次之一
pub async fn validate_batch_for_course(
    storage: &dyn Storage,
    batch: &str,
    course: &Course,
) -> Result<BatchKind> {
    let schedules = storage.list_schedules(Some(course.id), None).await?;
    if schedules.is_empty() {
        return Err(PlatformError::validation(format!(
            "No schedules available for course '{}'.",
            course.name
        )));
    }

    batch
        .trim()
        .parse::<BatchKind>()
        .ok()
        .filter(|kind| schedules.iter().any(|s| s.batch == *kind))
        .ok_or_else(|| {
            PlatformError::validation(format!(
                "Batch '{}' is not available for course '{}'.",
                batch, course.name
            ))
        })
}

pub async fn update_enrollment(
    service: &CourseService,
    subscription_id: i64,
    update_request: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = current_user(request)?;

    let not_found = || PlatformError::not_found("Enrollment not found or subscription is inactive.");

    let enrollment = storage
        .get_enrollment_by_subscription(subscription_id)
        .await?
        .filter(|e| e.student_id == user.id)
        .ok_or_else(not_found)?;
    let subscription_active = storage
        .get_subscription(subscription_id)
        .await?
        .is_some_and(|s| s.is_active);
    if !subscription_active {
        return Err(not_found().into());
    }

    let course = storage
        .get_course_by_id(enrollment.course_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Course not found."))?;
    let batch = validate_batch_for_course(storage.as_ref(), &update_request.batch, &course).await?;

    let updated = storage.update_enrollment_batch(enrollment.id, batch).await?;
    tracing::info!(
        "Student {} moved enrollment {} to {}",
        user.id,
        updated.id,
        batch
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EnrollmentResponse {
            id: updated.id,
            course: course.name,
            batch: updated.batch.to_string(),
            enrolled_at: updated.enrolled_at,
        },
        "Enrollment updated successfully.",
    )))
}
