use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use super::views::{ScheduleScope, course_view, course_views};
use crate::errors::PlatformError;
use crate::models::ApiResponse;
use crate::models::courses::responses::{CourseResponse, MyCourseItem};
use crate::models::payments::entities::PaymentStatus;
use crate::models::users::entities::UserRole;
use crate::services::current_user;

pub async fn my_courses(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = current_user(request)?;

    let items = match user.role {
        UserRole::Student => {
            let subscriptions = storage
                .list_subscriptions(Some(user.id), Some(PaymentStatus::Completed))
                .await?;
            let mut items = Vec::with_capacity(subscriptions.len());
            for subscription in subscriptions {
                let Some(course) = storage.get_course_by_id(subscription.course_id).await? else {
                    continue;
                };
                let batch = storage
                    .get_enrollment_by_subscription(subscription.id)
                    .await?
                    .map(|e| e.batch);

                // 只展示所选班次；没有选课记录时班次与排期为空
                let view = match batch {
                    Some(batch) => {
                        let scope = ScheduleScope {
                            batch: Some(batch),
                            ..Default::default()
                        };
                        let mut view = course_view(storage.as_ref(), course, scope).await?;
                        view.batches = vec![batch.to_string()];
                        view
                    }
                    None => CourseResponse {
                        course,
                        batches: Vec::new(),
                        schedule: Vec::new(),
                    },
                };

                items.push(MyCourseItem {
                    id: subscription.id,
                    course: view,
                    purchased_at: Some(subscription.purchased_at),
                    payment_status: Some(subscription.payment_status),
                });
            }
            items
        }
        UserRole::Teacher => {
            let schedules = storage.list_schedules(None, Some(user.id)).await?;
            let mut course_ids: Vec<i64> = schedules.iter().map(|s| s.course_id).collect();
            course_ids.sort_unstable();
            course_ids.dedup();

            let courses: HashMap<i64, _> = storage
                .list_courses(false)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();
            let taught = course_ids
                .iter()
                .filter_map(|id| courses.get(id).cloned())
                .collect();

            let scope = ScheduleScope {
                teacher_id: Some(user.id),
                ..Default::default()
            };
            course_views(storage.as_ref(), taught, scope)
                .await?
                .into_iter()
                .map(|view| MyCourseItem {
                    id: view.course.id,
                    course: view,
                    purchased_at: None,
                    payment_status: None,
                })
                .collect()
        }
        UserRole::Admin => {
            return Err(PlatformError::authorization(
                "You do not have permission to perform this action.",
            )
            .into());
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Courses retrieved successfully",
    )))
}
