use serde::Serialize;
use ts_rs::TS;

use crate::models::users::responses::UserResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}
