use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::Utc;

use crate::errors::PlatformError;
use crate::models::otp::entities::OtpLookup;
use crate::models::otp::requests::VerifyOtpRequest;
use crate::models::otp::responses::OtpVerifiedResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::detect_identifier;

use super::OtpService;

pub async fn handle_verify_otp(
    service: &OtpService,
    verify_request: VerifyOtpRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let identifier = verify_request.identifier.trim();
    let channel = detect_identifier(identifier, verify_request.identifier_type)
        .map_err(PlatformError::validation)?;

    let otp = storage
        .find_latest_otp(OtpLookup {
            identifier,
            channel,
            purpose: verify_request.purpose,
            code: Some(verify_request.otp_code.trim()),
            verified_only: false,
        })
        .await?;

    let Some(otp) = otp else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::OtpInvalid,
            "Invalid OTP.",
        ));
    };
    if otp.is_expired(Utc::now()) {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::OtpExpired,
            "OTP has expired.",
        ));
    }

    storage.mark_otp_verified(otp.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OtpVerifiedResponse {
            identifier: identifier.to_string(),
            identifier_type: channel,
            purpose: verify_request.purpose,
        },
        "OTP verified successfully.",
    )))
}
