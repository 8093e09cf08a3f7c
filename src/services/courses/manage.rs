use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use super::views::{ScheduleScope, course_view};
use crate::errors::PlatformError;
use crate::models::ApiResponse;
use crate::models::courses::entities::discounted_price;
use crate::models::courses::requests::{
    CreateCoursePricingRequest, CreateCourseRequest, NewCourse, UpdateCourseRequest,
};
use crate::utils::slug::slugify;

/// 课程字段规则，返回全部错误
fn course_field_errors(
    name: Option<&str>,
    slug: Option<&str>,
    duration_hours: Option<i32>,
    base_price: Option<i64>,
) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if name.is_some_and(|n| n.trim().is_empty()) {
        errors.push("Course name cannot be empty.");
    }
    if slug.is_some_and(|s| s.is_empty()) {
        errors.push("Slug must contain letters or digits.");
    }
    if duration_hours.is_some_and(|h| h <= 0) {
        errors.push("Duration hours must be greater than 0.");
    }
    if base_price.is_some_and(|p| p < 0) {
        errors.push("Base price cannot be negative.");
    }
    errors
}

fn reject(errors: Vec<&'static str>) -> Result<(), PlatformError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PlatformError::validation(errors.join(" | ")))
    }
}

pub async fn create_course(
    service: &CourseService,
    create_request: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let name = create_request.name.trim().to_string();
    // 未提供 slug 时由名称生成
    let slug = create_request
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(slugify)
        .unwrap_or_else(|| slugify(&name));

    reject(course_field_errors(
        Some(&name),
        Some(&slug),
        Some(create_request.duration_hours),
        Some(create_request.base_price),
    ))?;

    if storage.course_name_exists(&name, None).await? {
        return Err(PlatformError::conflict("A course with this name already exists.").into());
    }
    if storage.course_slug_exists(&slug, None).await? {
        return Err(PlatformError::conflict("A course with this slug already exists.").into());
    }

    let course = storage
        .create_course(NewCourse {
            name,
            slug,
            description: create_request.description,
            category: create_request.category.trim().to_string(),
            level: create_request.level,
            thumbnail: create_request.thumbnail,
            duration_hours: create_request.duration_hours,
            base_price: create_request.base_price,
            advantages: create_request.advantages,
            is_active: create_request.is_active,
        })
        .await?;
    info!("Course {} created", course.name);

    let view = course_view(storage.as_ref(), course, ScheduleScope::default()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(view, "Course created successfully")))
}

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    mut update_request: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    update_request.name = update_request.name.map(|n| n.trim().to_string());
    update_request.slug = update_request.slug.map(|s| slugify(s.trim()));
    update_request.category = update_request.category.map(|c| c.trim().to_string());

    reject(course_field_errors(
        update_request.name.as_deref(),
        update_request.slug.as_deref(),
        update_request.duration_hours,
        update_request.base_price,
    ))?;

    if let Some(name) = &update_request.name
        && storage.course_name_exists(name, Some(course_id)).await?
    {
        return Err(PlatformError::conflict("A course with this name already exists.").into());
    }
    if let Some(slug) = &update_request.slug
        && storage.course_slug_exists(slug, Some(course_id)).await?
    {
        return Err(PlatformError::conflict("A course with this slug already exists.").into());
    }

    let course = storage
        .update_course(course_id, update_request)
        .await?
        .ok_or_else(|| PlatformError::not_found("Course not found."))?;
    info!("Course {} updated", course.id);

    let view = course_view(storage.as_ref(), course, ScheduleScope::default()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Course updated successfully")))
}

pub async fn create_course_pricing(
    service: &CourseService,
    pricing_request: CreateCoursePricingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut errors = Vec::new();
    if pricing_request.original_price < 0 {
        errors.push("Original price cannot be negative.");
    }
    if !(0..=100).contains(&pricing_request.discount_percent) {
        errors.push("Discount percent must be between 0 and 100.");
    }
    reject(errors)?;

    if storage.get_course_by_id(pricing_request.course).await?.is_none() {
        return Err(PlatformError::not_found("Course not found.").into());
    }

    let Some(final_price) = discounted_price(
        pricing_request.original_price,
        pricing_request.discount_percent,
    ) else {
        return Err(PlatformError::validation("Original price is too large.").into());
    };
    let pricing = storage
        .create_course_pricing(
            pricing_request.course,
            pricing_request.original_price,
            pricing_request.discount_percent,
            final_price,
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        pricing,
        "Course pricing created successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::CourseLevel;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{TestApp, body_json, status_of};
    use actix_web::http::StatusCode;

    fn create_request(name: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            name: name.into(),
            slug: None,
            description: "From zero to web services".into(),
            category: "Programming".into(),
            level: CourseLevel::Intermediate,
            thumbnail: None,
            duration_hours: 40,
            base_price: 499_900,
            advantages: vec!["Projects".into()],
            is_active: true,
        }
    }

    #[test]
    fn test_field_errors_are_collected() {
        let errors = course_field_errors(Some("  "), None, Some(0), Some(-1));
        assert_eq!(errors.len(), 3);
        assert!(course_field_errors(Some("Rust"), Some("rust"), Some(1), Some(0)).is_empty());
    }

    #[actix_web::test]
    async fn test_create_update_and_price_course() {
        let app = TestApp::new().await;
        let admin = app.user("admin", "9000000021", UserRole::Admin).await;
        let req = app.request(Some(&admin));
        let service = CourseService::new_lazy();

        let created = service.create_course(create_request("Rust Web"), &req).await;
        assert_eq!(status_of(&created), StatusCode::CREATED);
        let body = body_json(created).await;
        assert_eq!(body["data"]["slug"], "rust-web");
        assert_eq!(body["data"]["batches"].as_array().unwrap().len(), 0);
        let id = body["data"]["id"].as_i64().unwrap();

        let duplicate = service.create_course(create_request("Rust Web"), &req).await;
        assert_eq!(status_of(&duplicate), StatusCode::CONFLICT);

        let updated = service
            .update_course(
                id,
                UpdateCourseRequest {
                    base_price: Some(399_900),
                    ..Default::default()
                },
                &req,
            )
            .await;
        assert_eq!(body_json(updated).await["data"]["base_price"], 399_900);

        let missing = service
            .update_course(id + 100, UpdateCourseRequest::default(), &req)
            .await;
        assert_eq!(status_of(&missing), StatusCode::NOT_FOUND);

        let pricing = service
            .create_pricing(
                CreateCoursePricingRequest {
                    course: id,
                    original_price: 999,
                    discount_percent: 15,
                },
                &req,
            )
            .await;
        assert_eq!(body_json(pricing).await["data"]["final_price"], 849);

        let bad_discount = service
            .create_pricing(
                CreateCoursePricingRequest {
                    course: id,
                    original_price: 999,
                    discount_percent: 101,
                },
                &req,
            )
            .await;
        assert_eq!(status_of(&bad_discount), StatusCode::BAD_REQUEST);

        let too_large = service
            .create_pricing(
                CreateCoursePricingRequest {
                    course: id,
                    original_price: 100_000_000_000_000_000,
                    discount_percent: 0,
                },
                &req,
            )
            .await;
        assert_eq!(status_of(&too_large), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(too_large).await["message"],
            "Original price is too large."
        );
    }
}
