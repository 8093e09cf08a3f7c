use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::PaymentService;
use crate::errors::PlatformError;
use crate::models::payments::entities::{NewSubscription, PaymentStatus};
use crate::models::payments::requests::CreateOrderRequest;
use crate::models::payments::responses::OrderResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::payments::{OrderNotes, PaymentGateway};
use crate::services::courses::validate_batch_for_course;
use crate::services::{current_user, error_response, shared};

pub async fn handle_create_order(
    service: &PaymentService,
    order_request: CreateOrderRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let user = current_user(request)?;

    // 1. 邮箱和手机都需已验证
    let mut unverified = Vec::new();
    if !user.email_verified {
        unverified.push("Email not verified.");
    }
    if !user.phone_verified {
        unverified.push("Phone not verified.");
    }
    if !unverified.is_empty() {
        return Err(PlatformError::validation(unverified.join(", ")).into());
    }

    // 2. 课程、重复购买与班次
    let course = storage
        .get_course_by_id(order_request.course_id)
        .await?
        .filter(|c| c.is_active);
    let Some(course) = course else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CourseNotFound,
            "Course not found or inactive.",
        ));
    };

    if storage
        .find_subscription(user.id, course.id, PaymentStatus::Completed)
        .await?
        .is_some()
    {
        return Err(PlatformError::validation("You are already subscribed to this course.").into());
    }

    let batch = match validate_batch_for_course(storage.as_ref(), &order_request.batch, &course)
        .await
    {
        Ok(batch) => batch,
        Err(PlatformError::Validation(message)) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BatchUnavailable,
                message,
            ));
        }
        Err(e) => return Err(e.into()),
    };

    // 3. 网关下单
    let gateway = shared::<dyn PaymentGateway>(request, "PaymentGateway")?;
    let pending = storage
        .find_subscription(user.id, course.id, PaymentStatus::Pending)
        .await?;
    let notes = OrderNotes {
        receipt: format!("receipt_{}_{}", user.id, course.id),
        student_id: user.id,
        course_id: course.id,
        batch: batch.to_string(),
    };
    let order = gateway
        .create_order(course.base_price, &config.payment.currency, &notes)
        .await?;

    // 4. 复用待支付订阅或新建
    let subscription = match pending {
        Some(pending) => {
            info!(
                "Reusing pending subscription {} for student {}",
                pending.id, user.id
            );
            storage
                .renew_subscription_order(pending.id, &order.id, order.amount)
                .await?
        }
        None => {
            storage
                .create_subscription(NewSubscription {
                    student_id: user.id,
                    course_id: course.id,
                    amount_paid: order.amount,
                    currency: order.currency.clone(),
                    order_id: order.id.clone(),
                    payment_method: "razorpay".to_string(),
                })
                .await?
        }
    };

    storage
        .upsert_enrollment(user.id, course.id, subscription.id, batch)
        .await?;
    info!(
        "Order {} created for subscription {} ({})",
        order.id, subscription.id, batch
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OrderResponse {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key: gateway.key_id().to_string(),
            subscription_id: subscription.id,
            batch: batch.to_string(),
        },
        "Order created successfully.",
    )))
}
