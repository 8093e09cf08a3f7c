use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::system::responses::HealthResponse;
use crate::models::{ApiResponse, AppStartTime};

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let uptime_secs = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            system_name: config.app.system_name.clone(),
            environment: config.app.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs,
        },
        "Service is healthy",
    )))
}
