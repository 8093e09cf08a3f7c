use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::CourseService;
use super::views::{ScheduleScope, course_views};
use crate::models::ApiResponse;
use crate::models::courses::requests::CourseQuery;
use crate::models::courses::responses::CourseResponse;
use crate::models::payments::entities::PaymentStatus;
use crate::models::users::entities::UserRole;
use crate::services::current_user;

pub async fn list_courses(
    service: &CourseService,
    query: CourseQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = current_user(request)?;

    let mut courses = storage.list_courses(true).await?;
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        courses.retain(|c| c.matches_search(search));
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        courses.retain(|c| c.matches_category(category));
    }

    let views: Vec<CourseResponse> = match user.role {
        UserRole::Student => {
            // 已购课程不再展示
            let purchased: HashSet<i64> = storage
                .list_subscriptions(Some(user.id), Some(PaymentStatus::Completed))
                .await?
                .into_iter()
                .map(|s| s.course_id)
                .collect();
            courses.retain(|c| !purchased.contains(&c.id));

            let scope = ScheduleScope {
                starting_from: Some(Utc::now().date_naive()),
                ..Default::default()
            };
            // 只保留有即将开课班次的课程
            course_views(storage.as_ref(), courses, scope)
                .await?
                .into_iter()
                .filter(|view| !view.batches.is_empty())
                .collect()
        }
        UserRole::Teacher => {
            let scope = ScheduleScope {
                teacher_id: Some(user.id),
                ..Default::default()
            };
            course_views(storage.as_ref(), courses, scope).await?
        }
        UserRole::Admin => {
            course_views(storage.as_ref(), courses, ScheduleScope::default()).await?
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        views,
        "Courses retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{TestApp, body_json};
    use crate::storage::sea_orm_storage::test_support::new_course;
    use chrono::Duration;

    fn query(search: Option<&str>) -> CourseQuery {
        CourseQuery {
            search: search.map(str::to_string),
            category: None,
        }
    }

    fn names(body: &serde_json::Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_course_visibility_by_role() {
        let app = TestApp::new().await;
        let today = Utc::now().date_naive();
        let upcoming = app.storage.create_course(new_course("Rust")).await.unwrap();
        let past = app.storage.create_course(new_course("Legacy Go")).await.unwrap();
        let teacher = app.schedule_course(upcoming.id, today + Duration::days(2)).await;
        app.schedule_course(past.id, today - Duration::days(30)).await;

        let service = CourseService::new_lazy();

        let student = app.user("asha", "9000000061", UserRole::Student).await;
        let body = body_json(
            service
                .list_courses(query(None), &app.request(Some(&student)))
                .await,
        )
        .await;
        assert_eq!(names(&body), vec!["Rust".to_string()]);
        let course = &body["data"][0];
        assert_eq!(course["batches"], serde_json::json!(["weekdays", "weekends"]));
        let schedule = course["schedule"].as_array().unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0]["days"].as_array().unwrap().len(), 5);
        assert_eq!(schedule[0]["time"], "09:00 AM to 10:00 AM");
        assert_eq!(schedule[1]["days"], serde_json::json!(["Saturday"]));

        let body = body_json(
            service
                .list_courses(query(None), &app.request(Some(&teacher)))
                .await,
        )
        .await;
        let courses = body["data"].as_array().unwrap();
        assert_eq!(courses.len(), 2);
        let legacy = courses.iter().find(|c| c["name"] == "Legacy Go").unwrap();
        assert_eq!(legacy["batches"].as_array().unwrap().len(), 0);

        let admin = app.user("admin", "9000000062", UserRole::Admin).await;
        let body = body_json(
            service
                .list_courses(query(Some("legacy")), &app.request(Some(&admin)))
                .await,
        )
        .await;
        assert_eq!(names(&body), vec!["Legacy Go".to_string()]);
        assert_eq!(body["data"][0]["batches"].as_array().unwrap().len(), 2);
    }
}
