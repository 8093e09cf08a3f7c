use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{
    CreateOrderRequest, PaymentRecordsQuery, VerifyPaymentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::PaymentService;

// 懒加载的全局 PaymentService 实例
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn create_order(
    req: HttpRequest,
    order_data: web::Json<CreateOrderRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.create_order(order_data.into_inner(), &req).await
}

pub async fn verify_payment(
    req: HttpRequest,
    payment_data: web::Json<VerifyPaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .verify_payment(payment_data.into_inner(), &req)
        .await
}

pub async fn transaction_report(request: HttpRequest) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.transaction_report(&request).await
}

pub async fn payment_records(
    req: HttpRequest,
    query: web::Query<PaymentRecordsQuery>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.payment_records(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/payments")
            .wrap(middlewares::RequireJWT)
            // 学生下单与支付校验
            .service(
                web::resource("/orders")
                    .route(web::post().to(create_order))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/verify")
                    .route(web::post().to(verify_payment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            // 管理员报表
            .service(
                web::resource("/transactions")
                    .route(web::get().to(transaction_report))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/records")
                    .route(web::get().to(payment_records))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
