use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::{PlatformError, Result};
use crate::models::ApiResponse;
use crate::models::users::entities::{TeacherProfile, User, UserRole};
use crate::models::users::requests::UpdateTeacherProfileRequest;
use crate::models::users::responses::{RoleProfile, UserResponse};
use crate::services::current_user;
use crate::storage::Storage;

use super::AuthService;

/// 用户信息附带对应角色的资料
pub(crate) async fn user_response(storage: &dyn Storage, user: User) -> Result<UserResponse> {
    let profile = match user.role {
        UserRole::Teacher => storage
            .get_teacher_profile(user.id)
            .await?
            .map(RoleProfile::Teacher),
        UserRole::Student => storage
            .get_student_profile(user.id)
            .await?
            .map(RoleProfile::Student),
        UserRole::Admin => None,
    };
    Ok(UserResponse::new(user, profile))
}

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = current_user(request)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user_response(storage.as_ref(), user).await?,
        "User information retrieved successfully",
    )))
}

/// 把请求中提供的字段合并进已有资料
fn merge_profile(mut profile: TeacherProfile, update: UpdateTeacherProfileRequest) -> TeacherProfile {
    if let Some(qualification) = update.qualification {
        profile.qualification = qualification.trim().to_string();
    }
    if let Some(years) = update.experience_years {
        profile.experience_years = years;
    }
    if let Some(specialization) = update.specialization {
        profile.specialization = specialization;
    }
    if let Some(bio) = update.bio {
        profile.bio = Some(bio).filter(|b| !b.trim().is_empty());
    }
    if let Some(url) = update.linkedin_url {
        profile.linkedin_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
    }
    if let Some(languages) = update.teaching_languages {
        profile.teaching_languages = languages;
    }
    profile
}

pub async fn handle_update_teacher_profile(
    service: &AuthService,
    update_request: UpdateTeacherProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = current_user(request)?;

    if let Some(specialization) = &update_request.specialization
        && specialization.is_empty()
    {
        return Err(PlatformError::validation("Specialization cannot be empty.").into());
    }

    let existing = storage
        .get_teacher_profile(user.id)
        .await?
        .unwrap_or_else(TeacherProfile::empty);
    let profile = merge_profile(existing, update_request);
    profile.validate().map_err(PlatformError::validation)?;

    let saved = storage.save_teacher_profile(user.id, profile).await?;
    tracing::info!("Teacher {} updated profile", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        saved,
        "Profile updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_profile_keeps_missing_fields() {
        let mut existing = TeacherProfile::empty();
        existing.qualification = "M.Sc".into();
        existing.teaching_languages = vec!["English".into()];

        let merged = merge_profile(
            existing,
            UpdateTeacherProfileRequest {
                qualification: None,
                experience_years: Some(6),
                specialization: Some(vec!["Statistics".into()]),
                bio: Some("  ".into()),
                linkedin_url: Some("https://www.linkedin.com/in/ravi".into()),
                teaching_languages: None,
            },
        );

        assert_eq!(merged.qualification, "M.Sc");
        assert_eq!(merged.experience_years, 6);
        assert_eq!(merged.specialization, vec!["Statistics".to_string()]);
        assert_eq!(merged.bio, None);
        assert_eq!(merged.teaching_languages, vec!["English".to_string()]);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_merged_profile_reports_all_errors() {
        let merged = merge_profile(
            TeacherProfile::empty(),
            UpdateTeacherProfileRequest {
                qualification: None,
                experience_years: Some(-1),
                specialization: None,
                bio: None,
                linkedin_url: Some("linkedin.com/in/ravi".into()),
                teaching_languages: None,
            },
        );
        let err = merged.validate().unwrap_err();
        assert_eq!(err.split(" | ").count(), 2);
    }
}
