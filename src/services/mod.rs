pub mod auth;
pub mod courses;
pub mod otp;
pub mod payments;
pub mod system;
pub mod teachers;
pub mod users;

pub use auth::AuthService;
pub use courses::CourseService;
pub use otp::OtpService;
pub use payments::PaymentService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};

use crate::errors::PlatformError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 从 app data 取出共享组件（通知、支付网关、缓存）
pub(crate) fn shared<T: ?Sized + 'static>(
    request: &HttpRequest,
    name: &str,
) -> Result<Arc<T>, PlatformError> {
    request
        .app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| PlatformError::io(format!("{name} not found in app data")))
}

/// 当前登录用户，需在 RequireJWT 之后调用
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, PlatformError> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        PlatformError::authentication("Authentication credentials were not provided.")
    })
}

/// 带业务错误码的错误响应
pub(crate) fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use actix_web::{HttpMessage, HttpRequest, HttpResponse, Result as ActixResult};
    use actix_web::{http::StatusCode, test::TestRequest, web};
    use chrono::{Duration, NaiveDate};

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaObjectCache;
    use crate::errors::Result;
    use crate::models::teachers::requests::NewTeacherSchedule;
    use crate::models::users::entities::{User, UserRole};
    use crate::notifications::{MailMessage, Notifier};
    use crate::payments::{OfflineGateway, PaymentGateway};
    use crate::scheduling::{CourseAssignment, plan_assignment};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::new_user;

    pub(crate) const GATEWAY_SECRET: &str = "test_secret";

    /// 记录投递内容，便于断言
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub emails: Mutex<Vec<MailMessage>>,
        pub sms: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_email(&self, message: MailMessage) -> Result<()> {
            self.emails.lock().unwrap().push(message);
            Ok(())
        }

        async fn send_sms(&self, phone: &str, text: &str) -> Result<()> {
            self.sms
                .lock()
                .unwrap()
                .push((phone.to_string(), text.to_string()));
            Ok(())
        }
    }

    pub(crate) struct TestApp {
        pub storage: Arc<dyn Storage>,
        pub cache: Arc<dyn ObjectCache>,
        pub notifier: Arc<RecordingNotifier>,
        pub gateway: Arc<dyn PaymentGateway>,
    }

    impl TestApp {
        pub(crate) async fn new() -> Self {
            let storage = SeaOrmStorage::in_memory().await.unwrap();
            Self {
                storage: Arc::new(storage),
                cache: Arc::new(MokaObjectCache::new().unwrap()),
                notifier: Arc::new(RecordingNotifier::default()),
                gateway: Arc::new(OfflineGateway::new("rzp_test_key", GATEWAY_SECRET, false)),
            }
        }

        pub(crate) async fn user(&self, username: &str, phone: &str, role: UserRole) -> User {
            self.storage
                .create_user(new_user(
                    username,
                    &format!("{username}@example.com"),
                    phone,
                    role,
                ))
                .await
                .unwrap()
        }

        /// 带齐 app data 的请求；给出用户时视为已通过 RequireJWT
        pub(crate) fn request(&self, user: Option<&User>) -> HttpRequest {
            let notifier: Arc<dyn Notifier> = self.notifier.clone();
            let req = TestRequest::default()
                .app_data(web::Data::new(self.storage.clone()))
                .app_data(web::Data::new(self.cache.clone()))
                .app_data(web::Data::new(notifier))
                .app_data(web::Data::new(self.gateway.clone()))
                .to_http_request();
            if let Some(user) = user {
                req.extensions_mut().insert(user.clone());
            }
            req
        }

        /// 为课程创建一名教师，排两周的工作日班（周一至周五 9-10 点）和周六班
        pub(crate) async fn schedule_course(&self, course_id: i64, start: NaiveDate) -> User {
            let assignment = CourseAssignment {
                course_id,
                batches: vec!["weekdays".into(), "weekends".into()],
                weekdays_start_date: Some(start),
                weekdays_end_date: Some(start + Duration::days(13)),
                weekdays_start: Some("09:00 AM".into()),
                weekdays_end: Some("10:00 AM".into()),
                weekend_start_date: Some(start),
                weekend_end_date: Some(start + Duration::days(13)),
                saturday_start: Some("10:00 AM".into()),
                saturday_end: Some("12:00 PM".into()),
                ..Default::default()
            };
            let schedules = plan_assignment(&assignment)
                .unwrap()
                .into_iter()
                .map(|plan| NewTeacherSchedule {
                    sessions: plan.expand(),
                    plan,
                })
                .collect();
            let username = format!("teacher_{course_id}");
            let (teacher, _, _) = self
                .storage
                .create_teacher_with_schedules(
                    new_user(
                        &username,
                        &format!("{username}@example.com"),
                        &format!("98{course_id:08}"),
                        UserRole::Teacher,
                    ),
                    schedules,
                )
                .await
                .unwrap();
            teacher
        }
    }

    pub(crate) fn status_of(result: &ActixResult<HttpResponse>) -> StatusCode {
        match result {
            Ok(response) => response.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    }

    pub(crate) async fn body_json(result: ActixResult<HttpResponse>) -> serde_json::Value {
        let response = match result {
            Ok(response) => response,
            Err(err) => err.error_response(),
        };
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
