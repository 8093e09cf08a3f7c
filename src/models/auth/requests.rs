use serde::Deserialize;
use ts_rs::TS;

// 登录请求，identifier 可为邮箱、手机号或用户名
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

// 学生注册
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct ForgotPasswordRequest {
    pub identifier: String,
    pub otp_code: String,
    pub new_password: String,
    pub confirm_password: String,
}
