//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 저장소 포트([`UserRepository`], [`ExplorationRepository`])와 그 구현들을 제공합니다.
//!
//! # 구현
//!
//! - [`mongo`] - MongoDB 기반 운영 저장소 (`Users`, `Exploration`, `counters` 컬렉션)
//! - [`memory`] - 프로세스 내부 저장소 (테스트, 로컬 실행)
//!
//! # 저장소의 책임
//!
//! - **식별자 할당**: 삽입 시점에 시퀀스에서 다음 id를 한 번만 할당
//! - **제약 조건**: 필수/길이 검사([`constraints::check_user`])와 이메일 유니크성
//! - **연관 관리**: 탐험 기록의 `user_id` 외래 키를 통한 1:N 연관 로드/동기화
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::{memory::MemoryStore, UserRepository};
//!
//! let store = MemoryStore::new();
//! let user = store.create(User::new("a@x.com", "Ann")).await?;
//! let found = store.find_by_email("a@x.com").await?;
//! ```

pub mod constraints;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::domain::entities::explorations::Exploration;
use crate::domain::entities::users::User;
use crate::errors::AppResult;

/// 사용자 레코드 저장소
///
/// 모든 구현은 다음을 보장해야 합니다.
///
/// 1. `create`가 반환한 id는 이후 어떤 갱신에서도 바뀌지 않는다.
/// 2. 두 레코드가 같은 `email`을 가질 수 없다 (`AppError::ConflictError`).
/// 3. `email`/`name` 누락과 `profileImageUrl` 길이 초과는 쓰기 전에 거부된다.
/// 4. 사용자 삭제는 탐험 기록을 삭제하지 않는다.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 새 사용자를 저장하고 할당된 id를 포함한 레코드를 반환합니다.
    ///
    /// 입력의 id는 무시됩니다. `explorations`에 포함된 기록은 이 사용자에게 연결됩니다.
    async fn create(&self, user: User) -> AppResult<User>;

    /// id로 사용자를 조회합니다. 연관 탐험 기록이 함께 로드됩니다.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// 이메일로 사용자를 조회합니다.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// 외부 계정(프로바이더, subject)으로 사용자를 조회합니다.
    ///
    /// 이 쌍은 저장소 수준에서 유니크하지 않으므로 가장 작은 id를 반환합니다.
    async fn find_by_oauth_account(&self, provider: &str, oauth_id: &str) -> AppResult<Option<User>>;

    /// 기존 사용자의 모든 필드와 연관 목록을 저장합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 저장 후 다시 로드된 레코드
    /// * `Err(AppError::NotFound)` - id가 없거나 존재하지 않는 사용자
    /// * `Err(AppError::ConflictError)` - 다른 레코드가 사용 중인 이메일
    async fn update(&self, user: &User) -> AppResult<User>;

    /// 사용자를 삭제하고 연결된 탐험 기록을 분리합니다.
    ///
    /// 삭제된 레코드가 없으면 `Ok(false)`를 반환합니다.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// 탐험 기록 참조 저장소
#[async_trait]
pub trait ExplorationRepository: Send + Sync {
    /// 새 탐험 기록을 만들고 id를 할당합니다.
    ///
    /// `user_id`가 존재하지 않는 사용자를 가리키면 `AppError::NotFound`를 반환합니다.
    async fn create_exploration(&self, user_id: Option<i64>) -> AppResult<Exploration>;

    async fn find_exploration(&self, id: i64) -> AppResult<Option<Exploration>>;

    /// 사용자에게 연결된 탐험 기록을 id 오름차순으로 반환합니다.
    async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Exploration>>;
}
