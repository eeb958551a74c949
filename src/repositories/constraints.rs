//! 저장소 경계 제약 조건 검사
//!
//! `User`에 `validator` 속성으로 선언된 제약(필수, 길이)을 평가하고
//! [`AppError`]의 제약 위반 변형으로 변환합니다. 모든 백엔드는 쓰기 전에
//! 이 검사를 거치며, 이메일 유니크성은 각 백엔드가 별도로 보장합니다.

use validator::{Validate, ValidationError};

use crate::domain::entities::users::{PROFILE_IMAGE_URL_MAX_LEN, User};
use crate::errors::{AppError, AppResult};

/// 선언된 제약 조건을 평가합니다.
///
/// 여러 필드가 동시에 위반된 경우 컬럼 이름 순으로 첫 번째 위반을 반환합니다.
///
/// # 반환값
///
/// * `Ok(())` - 모든 제약 만족
/// * `Err(AppError::MissingField)` - `email` 또는 `name` 누락
/// * `Err(AppError::FieldTooLong)` - `profileImageUrl` 512자 초과
pub fn check_user(user: &User) -> AppResult<()> {
    let Err(errors) = user.validate() else {
        return Ok(());
    };

    let mut violations: Vec<(String, ValidationError)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| errs.first().map(|e| (field.to_string(), e.clone())))
        .collect();
    violations.sort_by(|a, b| a.0.cmp(&b.0));

    match violations.into_iter().next() {
        Some((field, error)) => Err(to_app_error(user, &field, &error)),
        None => Err(AppError::ValidationError(errors.to_string())),
    }
}

fn to_app_error(user: &User, field: &str, error: &ValidationError) -> AppError {
    let column = column_name(field).to_string();

    match error.code.as_ref() {
        "required" => AppError::MissingField(column),
        "length" => {
            let max = error
                .params
                .get("max")
                .and_then(|v| v.as_u64())
                .unwrap_or(PROFILE_IMAGE_URL_MAX_LEN);
            let actual = user
                .profile_image_url()
                .map(|url| url.chars().count() as u64)
                .unwrap_or_default();
            AppError::FieldTooLong { field: column, max, actual }
        }
        code => AppError::ValidationError(format!("{}: {}", column, code)),
    }
}

/// 엔티티 필드 이름을 저장소 컬럼 이름으로 변환합니다.
fn column_name(field: &str) -> &str {
    match field {
        "oauth_provider" => "oauthProvider",
        "oauth_id" => "oauthId",
        "profile_image_url" => "profileImageUrl",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_user_passes() {
        let mut user = User::new("a@x.com", "Ann");
        user.set_profile_image_url(Some("https://img.example.com/a.png".to_string()));

        assert_eq!(check_user(&user), Ok(()));
    }

    #[test]
    fn test_missing_email_is_reported() {
        let mut user = User::default();
        user.set_name("Ann");

        assert_eq!(
            check_user(&user),
            Err(AppError::MissingField("email".to_string()))
        );
    }

    #[test]
    fn test_missing_name_is_reported() {
        let mut user = User::default();
        user.set_email("a@x.com");

        assert_eq!(
            check_user(&user),
            Err(AppError::MissingField("name".to_string()))
        );
    }

    #[test]
    fn test_email_reported_before_name() {
        assert_eq!(
            check_user(&User::default()),
            Err(AppError::MissingField("email".to_string()))
        );
    }

    #[test]
    fn test_profile_image_url_at_limit_passes() {
        let mut user = User::new("a@x.com", "Ann");
        user.set_profile_image_url(Some("a".repeat(512)));

        assert_eq!(check_user(&user), Ok(()));
    }

    #[test]
    fn test_profile_image_url_over_limit_fails() {
        let mut user = User::new("a@x.com", "Ann");
        user.set_profile_image_url(Some("a".repeat(513)));

        assert_eq!(
            check_user(&user),
            Err(AppError::FieldTooLong {
                field: "profileImageUrl".to_string(),
                max: 512,
                actual: 513,
            })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut user = User::new("a@x.com", "Ann");
        user.set_profile_image_url(Some("가".repeat(512)));

        assert_eq!(check_user(&user), Ok(()));
    }
}
