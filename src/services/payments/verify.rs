use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{info, warn};

use super::PaymentService;
use crate::errors::PlatformError;
use crate::models::payments::entities::PaymentStatus;
use crate::models::payments::requests::VerifyPaymentRequest;
use crate::models::payments::responses::VerifyPaymentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::payments::PaymentGateway;
use crate::services::{current_user, error_response, shared};

pub async fn handle_verify_payment(
    service: &PaymentService,
    verify_request: VerifyPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = current_user(request)?;

    let not_found = || {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::SubscriptionNotFound,
            "Subscription not found or already processed.",
        )
    };

    // 订阅号、订单号与学生必须一致
    let subscription = storage
        .get_subscription(verify_request.subscription_id)
        .await?
        .filter(|s| {
            s.student_id == user.id && s.order_id == verify_request.razorpay_order_id
        });
    let Some(subscription) = subscription else {
        return Ok(not_found());
    };

    let course_name = storage
        .get_course_by_id(subscription.course_id)
        .await?
        .map(|c| c.name)
        .ok_or_else(|| PlatformError::not_found("Course not found."))?;
    let enrollment = storage
        .get_enrollment_by_subscription(subscription.id)
        .await?;
    let missing_enrollment = || {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::SubscriptionNotFound,
            "No enrollment found for this subscription.",
        )
    };

    match subscription.payment_status {
        PaymentStatus::Completed => {
            let Some(enrollment) = enrollment else {
                return Ok(missing_enrollment());
            };
            info!(
                "Payment already verified for subscription {}",
                subscription.id
            );
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                VerifyPaymentResponse {
                    subscription_id: subscription.id,
                    course_name,
                    batch: enrollment.batch.to_string(),
                },
                "Payment already verified.",
            )));
        }
        PaymentStatus::Failed => return Ok(not_found()),
        PaymentStatus::Pending => {}
    }

    let payload = serde_json::json!({
        "razorpay_order_id": verify_request.razorpay_order_id,
        "razorpay_payment_id": verify_request.razorpay_payment_id,
        "razorpay_signature": verify_request.razorpay_signature,
    });

    let gateway = shared::<dyn PaymentGateway>(request, "PaymentGateway")?;
    if !gateway.verify_signature(
        &verify_request.razorpay_order_id,
        &verify_request.razorpay_payment_id,
        &verify_request.razorpay_signature,
    ) {
        warn!(
            "Signature verification failed for subscription {} (student {})",
            subscription.id, user.id
        );
        storage
            .fail_subscription(subscription.id, &verify_request.razorpay_payment_id, payload)
            .await?;
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::PaymentSignatureInvalid,
            "Invalid payment signature.",
        ));
    }

    // 选课记录缺失时不改动订阅状态
    let Some(enrollment) = enrollment else {
        return Ok(missing_enrollment());
    };

    let completed = storage
        .complete_subscription(subscription.id, &verify_request.razorpay_payment_id, payload)
        .await?;
    info!(
        "Payment verified for subscription {}, student {}, course {}, batch {}",
        completed.id, user.id, course_name, enrollment.batch
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        VerifyPaymentResponse {
            subscription_id: completed.id,
            course_name,
            batch: enrollment.batch.to_string(),
        },
        "Payment verified successfully.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::UpdateEnrollmentRequest;
    use crate::models::payments::requests::CreateOrderRequest;
    use crate::models::users::entities::UserRole;
    use crate::payments::signature;
    use crate::services::CourseService;
    use crate::services::test_support::{GATEWAY_SECRET, TestApp, body_json, status_of};
    use crate::storage::sea_orm_storage::test_support::{new_course, new_user};
    use chrono::{Duration, Utc};

    fn order(course_id: i64, batch: &str) -> CreateOrderRequest {
        CreateOrderRequest {
            course_id,
            batch: batch.into(),
        }
    }

    fn verification(order_id: &str, subscription_id: i64, signature: String) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            razorpay_order_id: order_id.into(),
            razorpay_payment_id: "pay_001".into(),
            razorpay_signature: signature,
            subscription_id,
        }
    }

    fn signed(order_id: &str) -> String {
        signature::sign(GATEWAY_SECRET, order_id, "pay_001").unwrap()
    }

    #[actix_web::test]
    async fn test_purchase_flow() {
        let app = TestApp::new().await;
        let student = app.user("asha", "9000000041", UserRole::Student).await;
        let course = app.storage.create_course(new_course("Rust")).await.unwrap();
        app.schedule_course(course.id, Utc::now().date_naive() + Duration::days(3))
            .await;
        let req = app.request(Some(&student));
        let payments = PaymentService::new_lazy();

        let first = body_json(payments.create_order(order(course.id, "weekdays"), &req).await).await;
        assert_eq!(first["data"]["amount"], 250_000);
        assert_eq!(first["data"]["key"], "rzp_test_key");
        let subscription_id = first["data"]["subscription_id"].as_i64().unwrap();
        let stale_order = first["data"]["order_id"].as_str().unwrap().to_string();

        // 待支付订阅被复用，订单号更新
        let second = body_json(payments.create_order(order(course.id, "weekdays"), &req).await).await;
        assert_eq!(second["data"]["subscription_id"], subscription_id);
        let order_id = second["data"]["order_id"].as_str().unwrap().to_string();
        assert_ne!(order_id, stale_order);

        let stale = payments
            .verify_payment(verification(&stale_order, subscription_id, signed(&stale_order)), &req)
            .await;
        assert_eq!(
            body_json(stale).await["message"],
            "Subscription not found or already processed."
        );

        let verified = payments
            .verify_payment(verification(&order_id, subscription_id, signed(&order_id)), &req)
            .await;
        assert_eq!(status_of(&verified), StatusCode::OK);
        let body = body_json(verified).await;
        assert_eq!(body["data"]["course_name"], "Rust");
        assert_eq!(body["data"]["batch"], "weekdays");

        let again = payments
            .verify_payment(verification(&order_id, subscription_id, signed(&order_id)), &req)
            .await;
        assert_eq!(body_json(again).await["message"], "Payment already verified.");

        let repeat = payments.create_order(order(course.id, "weekdays"), &req).await;
        assert_eq!(
            body_json(repeat).await["message"],
            "You are already subscribed to this course."
        );

        let courses = CourseService::new_lazy();
        let mine = body_json(courses.my_courses(&req).await).await;
        let items = mine["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], subscription_id);
        assert_eq!(items[0]["course"]["batches"], serde_json::json!(["weekdays"]));
        assert_eq!(items[0]["payment_status"], "completed");

        let moved = courses
            .update_enrollment(
                subscription_id,
                UpdateEnrollmentRequest {
                    batch: "weekends".into(),
                },
                &req,
            )
            .await;
        assert_eq!(body_json(moved).await["data"]["batch"], "weekends");

        let invalid = courses
            .update_enrollment(
                subscription_id,
                UpdateEnrollmentRequest {
                    batch: "evenings".into(),
                },
                &req,
            )
            .await;
        assert_eq!(
            body_json(invalid).await["message"],
            "Batch 'evenings' is not available for course 'Rust'."
        );

        let stranger = app.user("ravi", "9000000042", UserRole::Student).await;
        let foreign = courses
            .update_enrollment(
                subscription_id,
                UpdateEnrollmentRequest {
                    batch: "weekdays".into(),
                },
                &app.request(Some(&stranger)),
            )
            .await;
        assert_eq!(status_of(&foreign), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_bad_signature_fails_subscription() {
        let app = TestApp::new().await;
        let student = app.user("asha", "9000000043", UserRole::Student).await;
        let course = app.storage.create_course(new_course("Go")).await.unwrap();
        app.schedule_course(course.id, Utc::now().date_naive()).await;
        let req = app.request(Some(&student));
        let payments = PaymentService::new_lazy();

        let created = body_json(payments.create_order(order(course.id, "weekends"), &req).await).await;
        let subscription_id = created["data"]["subscription_id"].as_i64().unwrap();
        let order_id = created["data"]["order_id"].as_str().unwrap().to_string();

        let rejected = payments
            .verify_payment(verification(&order_id, subscription_id, "deadbeef".into()), &req)
            .await;
        assert_eq!(status_of(&rejected), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(rejected).await["message"], "Invalid payment signature.");

        let stored = app.storage.get_subscription(subscription_id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Failed);

        let retry = payments
            .verify_payment(verification(&order_id, subscription_id, signed(&order_id)), &req)
            .await;
        assert_eq!(
            body_json(retry).await["message"],
            "Subscription not found or already processed."
        );
    }

    #[actix_web::test]
    async fn test_order_preconditions() {
        let app = TestApp::new().await;
        let mut unverified = new_user("neha", "neha@example.com", "9000000044", UserRole::Student);
        unverified.email_verified = false;
        unverified.phone_verified = false;
        let unverified = app.storage.create_user(unverified).await.unwrap();
        let student = app.user("asha", "9000000045", UserRole::Student).await;
        let course = app.storage.create_course(new_course("Rust")).await.unwrap();
        let payments = PaymentService::new_lazy();

        let rejected = payments
            .create_order(order(course.id, "weekdays"), &app.request(Some(&unverified)))
            .await;
        assert_eq!(
            body_json(rejected).await["message"],
            "Email not verified., Phone not verified."
        );

        let req = app.request(Some(&student));
        let unscheduled = payments.create_order(order(course.id, "weekdays"), &req).await;
        assert_eq!(
            body_json(unscheduled).await["message"],
            "No schedules available for course 'Rust'."
        );

        let missing = payments.create_order(order(course.id + 9, "weekdays"), &req).await;
        assert_eq!(
            body_json(missing).await["message"],
            "Course not found or inactive."
        );
    }
}
