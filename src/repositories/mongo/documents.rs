//! `Users` 컬렉션 문서 매핑
//!
//! 엔티티의 선택적 필수 필드(`Option<String>`)를 컬럼 제약에 맞는
//! 필수 필드(`String`)로 좁히는 경계입니다. 이 변환이 실패하면 문서는 쓰이지 않습니다.

use serde::{Deserialize, Serialize};

use crate::domain::entities::explorations::Exploration;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};

/// `Users` 컬렉션의 한 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    #[serde(rename = "oauthProvider", default, skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,
    #[serde(rename = "oauthId", default, skip_serializing_if = "Option::is_none")]
    pub oauth_id: Option<String>,
    #[serde(rename = "profileImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl UserDocument {
    /// 엔티티를 주어진 id의 문서로 변환합니다.
    pub fn from_user(user: &User, user_id: i64) -> AppResult<Self> {
        Ok(Self {
            user_id,
            email: required(user.email(), "email")?,
            name: required(user.name(), "name")?,
            oauth_provider: user.oauth_provider().map(str::to_string),
            oauth_id: user.oauth_id().map(str::to_string),
            profile_image_url: user.profile_image_url().map(str::to_string),
            locale: user.locale().map(str::to_string),
        })
    }

    /// 문서와 로드된 연관 목록으로 엔티티를 구성합니다.
    pub fn into_user(self, explorations: Vec<Exploration>) -> User {
        let mut user = User::new(self.email, self.name).with_id(self.user_id);
        user.set_oauth_provider(self.oauth_provider);
        user.set_oauth_id(self.oauth_id);
        user.set_profile_image_url(self.profile_image_url);
        user.set_locale(self.locale);
        user.with_loaded_explorations(explorations)
    }
}

fn required(value: Option<&str>, column: &str) -> AppResult<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| AppError::MissingField(column.to_string()))
}
