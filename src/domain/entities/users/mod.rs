//! Users Entity Module
//!
//! 사용자 계정 엔티티를 정의하는 모듈입니다.
//! OAuth 프로바이더 연결 정보와 탐험 기록 연관을 포함하는 `User` 엔티티를 제공합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::User;
//!
//! let mut user = User::new("user@example.com", "Ann");
//! user.set_oauth_provider(Some("google".to_string()));
//! user.set_oauth_id(Some("google_user_id_123".to_string()));
//!
//! let saved = user_repo.create(user).await?;
//! assert!(saved.id().is_some());
//! ```

pub mod user;

pub use user::{User, PROFILE_IMAGE_URL_MAX_LEN};
