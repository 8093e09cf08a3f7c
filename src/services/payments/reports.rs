use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::PaymentService;
use crate::errors::PlatformError;
use crate::models::payments::entities::{PaymentRecordFilter, PaymentStatus};
use crate::models::payments::requests::PaymentRecordsQuery;
use crate::models::payments::responses::{PaymentRecordItem, TransactionReportItem};
use crate::models::{ApiResponse, PaginatedResponse, PaginationInfo};

const RECENT_TRANSACTIONS: u64 = 5;

/// 接受 RFC 3339、`YYYY-MM-DD HH:MM:SS` 或 `YYYY-MM-DD`（当天零点，UTC）
fn parse_record_date(field: &str, value: &str) -> Result<DateTime<Utc>, PlatformError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| PlatformError::validation(format!("Enter a valid date/time for {field}.")))
}

pub async fn transaction_report(
    service: &PaymentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let items: Vec<TransactionReportItem> = storage
        .list_recent_subscriptions(RECENT_TRANSACTIONS)
        .await?
        .into_iter()
        .map(|s| TransactionReportItem {
            payment_mode: s.payment_method,
            date: s.purchased_at,
            message_info: s.payment_status.into(),
            amount: s.amount_paid,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Transaction report retrieved successfully.",
    )))
}

fn empty_records(page: u64, size: u64) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(
        PaginatedResponse::<PaymentRecordItem> {
            items: Vec::new(),
            pagination: PaginationInfo::new(page, size, 0),
        },
        "Payment records retrieved successfully.",
    ))
}

pub async fn payment_records(
    service: &PaymentService,
    query: PaymentRecordsQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    let mut filter = PaymentRecordFilter {
        completed_from: query
            .start_date
            .as_deref()
            .map(|v| parse_record_date("start_date", v))
            .transpose()?,
        completed_to: query
            .end_date
            .as_deref()
            .map(|v| parse_record_date("end_date", v))
            .transpose()?,
        ..Default::default()
    };
    // 未知状态匹配不到任何记录
    if let Some(status) = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        match status.parse::<PaymentStatus>() {
            Ok(status) => filter.status = Some(status),
            Err(_) => return Ok(empty_records(page, size)),
        }
    }

    let courses: HashMap<i64, String> = storage
        .list_courses(false)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    // 课程名子串匹配（不区分大小写）
    if let Some(needle) = query.course.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = needle.to_lowercase();
        let ids: Vec<i64> = courses
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(id, _)| *id)
            .collect();
        if ids.is_empty() {
            return Ok(empty_records(page, size));
        }
        filter.course_ids = Some(ids);
    }

    let (subscriptions, total) = storage.list_payment_records(filter, page, size).await?;

    let mut users = HashMap::new();
    let mut items = Vec::with_capacity(subscriptions.len());
    for subscription in subscriptions {
        if !users.contains_key(&subscription.student_id) {
            let user = storage.get_user_by_id(subscription.student_id).await?;
            users.insert(subscription.student_id, user);
        }
        let Some(Some(student)) = users.get(&subscription.student_id) else {
            continue;
        };
        let batch = storage
            .get_enrollment_by_subscription(subscription.id)
            .await?
            .map(|e| e.batch.to_string());

        items.push(PaymentRecordItem {
            name: student.username.clone(),
            email: student.email.clone(),
            phone_number: student.phone_number.clone(),
            course: courses
                .get(&subscription.course_id)
                .cloned()
                .unwrap_or_default(),
            batch,
            registration_date_time: subscription.purchased_at,
            payment_method: subscription.payment_method,
            amount_paid: subscription.amount_paid,
            start_date_time: subscription.payment_completed_at,
            end_date_time: subscription.payment_completed_at,
            status: subscription.payment_status,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        },
        "Payment records retrieved successfully.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::models::payments::entities::NewSubscription;
    use crate::models::users::entities::UserRole;
    use crate::scheduling::BatchKind;
    use crate::services::test_support::{TestApp, body_json, status_of};
    use crate::storage::sea_orm_storage::test_support::new_course;
    use actix_web::http::StatusCode;

    fn query(course: Option<&str>, status: Option<&str>, start: Option<&str>) -> PaymentRecordsQuery {
        PaymentRecordsQuery {
            pagination: PaginationQuery::default(),
            start_date: start.map(str::to_string),
            end_date: None,
            course: course.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_record_date_formats() {
        let midnight = parse_record_date("start_date", "2026-03-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        let spaced = parse_record_date("start_date", "2026-03-01 08:30:00").unwrap();
        assert_eq!(spaced.to_rfc3339(), "2026-03-01T08:30:00+00:00");
        let offset = parse_record_date("start_date", "2026-03-01T10:00:00+05:30").unwrap();
        assert_eq!(offset.to_rfc3339(), "2026-03-01T04:30:00+00:00");
        assert!(parse_record_date("start_date", "01/03/2026").is_err());
    }

    #[actix_web::test]
    async fn test_reports() {
        let app = TestApp::new().await;
        let admin = app.user("admin", "9000000051", UserRole::Admin).await;
        let student = app.user("asha", "9000000052", UserRole::Student).await;
        let rust = app.storage.create_course(new_course("Rust Basics")).await.unwrap();
        let go = app.storage.create_course(new_course("Go")).await.unwrap();

        for (course_id, order_id) in [(rust.id, "order_a"), (go.id, "order_b")] {
            let sub = app
                .storage
                .create_subscription(NewSubscription {
                    student_id: student.id,
                    course_id,
                    amount_paid: 250_000,
                    currency: "INR".into(),
                    order_id: order_id.into(),
                    payment_method: "razorpay".into(),
                })
                .await
                .unwrap();
            app.storage
                .upsert_enrollment(student.id, course_id, sub.id, BatchKind::Weekdays)
                .await
                .unwrap();
            if course_id == rust.id {
                app.storage
                    .complete_subscription(sub.id, "pay_a", serde_json::json!({}))
                    .await
                    .unwrap();
            }
        }

        let req = app.request(Some(&admin));
        let service = PaymentService::new_lazy();

        let report = body_json(service.transaction_report(&req).await).await;
        let report = report["data"].as_array().unwrap();
        assert_eq!(report.len(), 2);
        let outcomes: Vec<&str> = report
            .iter()
            .map(|r| r["message_info"].as_str().unwrap())
            .collect();
        assert!(outcomes.contains(&"Success") && outcomes.contains(&"Failure"));

        let completed = body_json(
            service
                .payment_records(query(Some("rust"), Some("Completed"), None), &req)
                .await,
        )
        .await;
        let items = completed["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "asha");
        assert_eq!(items[0]["course"], "Rust Basics");
        assert_eq!(items[0]["batch"], "weekdays");
        assert_eq!(completed["data"]["pagination"]["total"], 1);

        let nothing = body_json(
            service
                .payment_records(query(Some("python"), None, None), &req)
                .await,
        )
        .await;
        assert_eq!(nothing["data"]["items"].as_array().unwrap().len(), 0);

        let all = body_json(service.payment_records(query(None, None, None), &req).await).await;
        assert_eq!(all["data"]["pagination"]["total"], 2);

        let bad_date = service
            .payment_records(query(None, None, Some("yesterday")), &req)
            .await;
        assert_eq!(status_of(&bad_date), StatusCode::BAD_REQUEST);

        let unknown_status = service
            .payment_records(query(None, Some("refunded"), None), &req)
            .await;
        assert_eq!(status_of(&unknown_status), StatusCode::OK);
        let unknown_status = body_json(unknown_status).await;
        assert_eq!(unknown_status["data"]["items"].as_array().unwrap().len(), 0);
        assert_eq!(unknown_status["data"]["pagination"]["total"], 0);

        let any_case = body_json(
            service
                .payment_records(query(None, Some("PENDING"), None), &req)
                .await,
        )
        .await;
        assert_eq!(any_case["data"]["pagination"]["total"], 1);
    }
}
