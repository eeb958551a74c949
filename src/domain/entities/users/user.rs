//! User Entity Implementation
//!
//! 사용자 계정 엔티티의 핵심 구현체입니다.
//! `Users` 테이블(컬렉션)의 한 레코드와 1:1로 대응되며,
//! 해당 사용자를 외래 키(`user_id`)로 참조하는 탐험 기록 목록을 함께 노출합니다.
//!
//! 엔티티는 수동적인 데이터 홀더입니다. 접근자는 검증도 I/O도 수행하지 않으며,
//! `validator` 속성으로 선언된 제약 조건은 저장소 경계에서만 평가됩니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::explorations::Exploration;

/// `profileImageUrl` 컬럼의 최대 길이 (문자 수)
pub const PROFILE_IMAGE_URL_MAX_LEN: u64 = 512;

/// 사용자 엔티티
///
/// 최초 OAuth 로그인 시점에 외부 협력자가 생성하고, 이후 계정 관리 로직이
/// 필드 단위로 수정합니다. `id`는 저장 시점에 저장소가 한 번만 할당하며
/// 이후 절대 바뀌지 않습니다.
///
/// # 컬럼 매핑
///
/// | 필드 | 컬럼 | 제약 |
/// |------|------|------|
/// | `id` | `user_id` | 저장소 할당, 불변 |
/// | `email` | `email` | 필수, 유니크 |
/// | `name` | `name` | 필수 |
/// | `oauth_provider` | `oauthProvider` | 선택 |
/// | `oauth_id` | `oauthId` | 선택 |
/// | `profile_image_url` | `profileImageUrl` | 선택, 최대 512자 |
/// | `locale` | `locale` | 선택 |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 식별자는 저장소만 할당하므로 역직렬화 입력은 무시합니다.
    #[serde(rename = "user_id", skip_deserializing, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[validate(required)]
    email: Option<String>,
    #[validate(required)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oauth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oauth_id: Option<String>,
    #[validate(length(max = 512))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    /// 비소유 연관. 사용자 삭제 시에도 탐험 기록은 삭제되지 않습니다.
    #[serde(default)]
    explorations: Vec<Exploration>,
    /// 저장소에서 로드된 시점의 연관 탐험 id. 갱신 시 분리 대상은 이 범위로 한정됩니다.
    #[serde(skip)]
    loaded_exploration_ids: Vec<i64>,
}

impl User {
    /// 필수 필드만 채운 저장 전 사용자를 생성합니다.
    ///
    /// ```rust,ignore
    /// let user = User::new("a@x.com", "Ann");
    /// assert_eq!(user.id(), None);
    /// ```
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 저장소가 할당한 식별자. 저장 전에는 `None`입니다.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// 저장소 계층 전용 식별자 할당
    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// 저장소 계층 전용: 로드된 연관을 설정하고 그 id를 기록합니다.
    pub(crate) fn with_loaded_explorations(mut self, explorations: Vec<Exploration>) -> Self {
        self.loaded_exploration_ids = explorations.iter().map(Exploration::id).collect();
        self.explorations = explorations;
        self
    }

    /// 마지막 로드 시점에 이 사용자에게 연결되어 있던 탐험 id
    pub(crate) fn loaded_exploration_ids(&self) -> &[i64] {
        &self.loaded_exploration_ids
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// 외부 인증 프로바이더 이름 (예: `google`)
    pub fn oauth_provider(&self) -> Option<&str> {
        self.oauth_provider.as_deref()
    }

    pub fn set_oauth_provider(&mut self, oauth_provider: Option<String>) {
        self.oauth_provider = oauth_provider;
    }

    /// 프로바이더가 발급한 subject 식별자
    pub fn oauth_id(&self) -> Option<&str> {
        self.oauth_id.as_deref()
    }

    pub fn set_oauth_id(&mut self, oauth_id: Option<String>) {
        self.oauth_id = oauth_id;
    }

    pub fn profile_image_url(&self) -> Option<&str> {
        self.profile_image_url.as_deref()
    }

    /// 길이 제한(512자)은 저장 시점에 검사됩니다.
    pub fn set_profile_image_url(&mut self, profile_image_url: Option<String>) {
        self.profile_image_url = profile_image_url;
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    /// 메모리에 로드된 연관 탐험 기록 (탐험 id 오름차순)
    pub fn explorations(&self) -> &[Exploration] {
        &self.explorations
    }

    /// 연관 목록을 교체합니다. 저장소에 반영하려면 `UserRepository::update`를 호출해야 합니다.
    pub fn set_explorations(&mut self, explorations: Vec<Exploration>) {
        self.explorations = explorations;
    }

    pub fn add_exploration(&mut self, exploration: Exploration) {
        self.explorations.push(exploration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_id_and_no_explorations() {
        let user = User::new("a@x.com", "Ann");

        assert_eq!(user.id(), None);
        assert_eq!(user.email(), Some("a@x.com"));
        assert_eq!(user.name(), Some("Ann"));
        assert!(user.explorations().is_empty());
    }

    #[test]
    fn test_default_user_has_all_fields_absent() {
        let user = User::default();

        assert_eq!(user.email(), None);
        assert_eq!(user.name(), None);
        assert_eq!(user.oauth_provider(), None);
        assert_eq!(user.locale(), None);
    }

    #[test]
    fn test_setters_do_not_touch_id() {
        let mut user = User::new("a@x.com", "Ann").with_id(1);

        user.set_email("b@x.com");
        user.set_name("Bob");
        user.set_locale(Some("ko-KR".to_string()));

        assert_eq!(user.id(), Some(1));
        assert_eq!(user.email(), Some("b@x.com"));
    }

    #[test]
    fn test_accessors_perform_no_validation() {
        let mut user = User::new("a@x.com", "Ann");
        let long_url = "x".repeat(1000);

        user.set_profile_image_url(Some(long_url.clone()));
        user.set_oauth_provider(Some("google".to_string()));

        assert_eq!(user.profile_image_url(), Some(long_url.as_str()));
        assert_eq!(user.oauth_id(), None);
    }

    #[test]
    fn test_explorations_are_replaced_and_appended() {
        let mut user = User::new("a@x.com", "Ann");

        user.set_explorations(vec![Exploration::new(3, None)]);
        user.add_exploration(Exploration::new(4, None));

        let ids: Vec<i64> = user.explorations().iter().map(Exploration::id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_deserialized_user_id_is_ignored() {
        let user: User = serde_json::from_value(serde_json::json!({
            "user_id": 9,
            "email": "a@x.com",
            "name": "Ann"
        }))
        .unwrap();

        assert_eq!(user.id(), None);
        assert_eq!(user.email(), Some("a@x.com"));
    }

    #[test]
    fn test_set_explorations_keeps_loaded_snapshot() {
        let mut user = User::new("a@x.com", "Ann")
            .with_id(1)
            .with_loaded_explorations(vec![Exploration::new(3, Some(1))]);

        user.set_explorations(Vec::new());

        assert_eq!(user.loaded_exploration_ids(), &[3]);
        assert!(user.explorations().is_empty());
    }

    #[test]
    fn test_serializes_with_column_names() {
        let mut user = User::new("a@x.com", "Ann").with_id(9);
        user.set_oauth_id(Some("sub-1".to_string()));

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["user_id"], 9);
        assert_eq!(json["oauthId"], "sub-1");
        assert!(json.get("profileImageUrl").is_none());
    }
}
