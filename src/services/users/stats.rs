use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::responses::UserStatusCounts;

fn count_statuses(students: &[User]) -> UserStatusCounts {
    let active = students.iter().filter(|s| s.is_active()).count() as u64;
    let total = students.len() as u64;
    UserStatusCounts {
        active_users: active,
        registered_users: total,
        deactivated_users: total - active,
    }
}

pub async fn user_status_counts(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let students = storage.list_users_by_role(UserRole::Student).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        count_statuses(&students),
        "User status counts retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use crate::services::test_support::TestApp;

    #[actix_web::test]
    async fn test_counts_only_students() {
        let app = TestApp::new().await;
        app.user("s1", "9000000011", UserRole::Student).await;
        let mut inactive = app.user("s2", "9000000012", UserRole::Student).await;
        app.user("t1", "9000000013", UserRole::Teacher).await;

        let mut students = app.storage.list_users_by_role(UserRole::Student).await.unwrap();
        inactive.status = UserStatus::Inactive;
        students.retain(|s| s.id != inactive.id);
        students.push(inactive);

        assert_eq!(
            count_statuses(&students),
            UserStatusCounts {
                active_users: 1,
                registered_users: 2,
                deactivated_users: 1,
            }
        );
    }
}
