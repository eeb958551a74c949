//! # 사용자 리포지토리 구현
//!
//! `Users` 컬렉션에 대한 데이터 액세스 계층입니다.
//!
//! ## 특징
//!
//! - **시퀀스 id**: `counters` 컬렉션에서 `user_id`를 발급하며 갱신 시 절대 바꾸지 않음
//! - **데이터 무결성**: 쓰기 전 제약 검사 + `email` 유니크 인덱스
//! - **비소유 연관**: `Exploration.user_id` 외래 키로 탐험 기록을 로드/동기화
//! - **원자적 쓰기**: 사용자 문서와 연관 동기화는 하나의 트랜잭션으로 커밋 (레플리카 셋 필요)

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::explorations::Exploration;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::constraints::check_user;
use crate::repositories::mongo::documents::UserDocument;
use crate::repositories::mongo::exploration_repo::{
    detach_all_for_user, exploration_collection, load_for_user, sync_for_user,
};
use crate::repositories::mongo::{map_user_write_error, USERS_COLLECTION, USER_ID_SEQUENCE};
use crate::repositories::UserRepository;

/// 사용자 데이터 액세스 리포지토리
///
/// ## 저장 구조
///
/// - **컬렉션명**: `Users`
/// - **인덱스**: `user_id`(unique), `email`(unique), (`oauthProvider`, `oauthId`)
///
/// ## 에러 처리
///
/// - **DatabaseError**: MongoDB 연결 오류, 쿼리 실행 오류
/// - **MissingField / FieldTooLong**: 선언된 컬럼 제약 위반
/// - **ConflictError**: 이메일 중복 (사전 조회 또는 E11000)
/// - **NotFound**: 저장되지 않았거나 존재하지 않는 사용자, 없는 탐험 기록
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let repo = MongoUserRepository::new(database.clone());
/// repo.create_indexes().await?;
///
/// let mut user = repo.create(User::new("john@example.com", "John")).await?;
/// user.set_locale(Some("ko-KR".to_string()));
/// let user = repo.update(&user).await?;
/// ```
pub struct MongoUserRepository {
    db: Arc<Database>,
}

impl MongoUserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<UserDocument> {
        self.db.get_database().collection::<UserDocument>(USERS_COLLECTION)
    }

    fn explorations(&self) -> Collection<Exploration> {
        exploration_collection(&self.db)
    }

    async fn hydrate(&self, document: Option<UserDocument>) -> AppResult<Option<User>> {
        match document {
            Some(document) => {
                let explorations = load_for_user(&self.explorations(), document.user_id).await?;
                Ok(Some(document.into_user(explorations)))
            }
            None => Ok(None),
        }
    }

    async fn find_document(&self, filter: mongodb::bson::Document) -> AppResult<Option<UserDocument>> {
        self.collection()
            .find_one(filter)
            .sort(doc! { "user_id": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> AppResult<bool> {
        let existing = self.find_document(doc! { "email": email }).await?;
        Ok(existing.is_some_and(|document| Some(document.user_id) != except))
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 1. **`user_id` 유니크 인덱스** - 식별자 컬럼
    /// 2. **`email` 유니크 인덱스** - 동시 삽입 경쟁에서도 중복 이메일 방지
    /// 3. **(`oauthProvider`, `oauthId`) 인덱스** - 외부 계정 조회 (유니크 아님)
    ///
    /// 이미 중복 데이터가 있는 경우 유니크 인덱스 생성은 실패합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("user_id_unique".to_string())
                .build())
            .build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let oauth_index = IndexModel::builder()
            .keys(doc! { "oauthProvider": 1, "oauthId": 1 })
            .options(IndexOptions::builder()
                .name("oauth_account".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([id_index, email_index, oauth_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        info!("Users 인덱스 준비 완료");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        check_user(&user)?;
        let email = user.email().unwrap_or_default();

        if self.email_taken(email, None).await? {
            return Err(AppError::ConflictError(format!("이미 사용 중인 이메일입니다: {}", email)));
        }

        let id = self.db.next_sequence(USER_ID_SEQUENCE).await?;
        let document = UserDocument::from_user(&user, id)?;

        let mut session = self.db.start_transaction().await?;
        let written = async {
            self.collection()
                .insert_one(&document)
                .session(&mut session)
                .await
                .map_err(|e| map_user_write_error(e, email))?;
            sync_for_user(&self.explorations(), &mut session, id, user.explorations(), &[]).await
        }
        .await;
        Database::finish_transaction(session, written).await?;

        debug!("사용자 생성: user_id={}", id);
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("user {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let document = self.find_document(doc! { "user_id": id }).await?;
        self.hydrate(document).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let document = self.find_document(doc! { "email": email }).await?;
        self.hydrate(document).await
    }

    async fn find_by_oauth_account(&self, provider: &str, oauth_id: &str) -> AppResult<Option<User>> {
        let document = self
            .find_document(doc! { "oauthProvider": provider, "oauthId": oauth_id })
            .await?;
        self.hydrate(document).await
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let id = user
            .id()
            .ok_or_else(|| AppError::NotFound("저장되지 않은 사용자입니다".to_string()))?;
        check_user(user)?;
        let email = user.email().unwrap_or_default();

        if self.email_taken(email, Some(id)).await? {
            return Err(AppError::ConflictError(format!("이미 사용 중인 이메일입니다: {}", email)));
        }

        let document = UserDocument::from_user(user, id)?;

        let mut session = self.db.start_transaction().await?;
        let written = async {
            let result = self
                .collection()
                .replace_one(doc! { "user_id": id }, &document)
                .session(&mut session)
                .await
                .map_err(|e| map_user_write_error(e, email))?;

            if result.matched_count == 0 {
                return Err(AppError::NotFound(format!("user {}", id)));
            }

            sync_for_user(
                &self.explorations(),
                &mut session,
                id,
                user.explorations(),
                user.loaded_exploration_ids(),
            )
            .await
        }
        .await;
        Database::finish_transaction(session, written).await?;

        debug!("사용자 갱신: user_id={}", id);
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut session = self.db.start_transaction().await?;
        let deleted = async {
            let result = self
                .collection()
                .delete_one(doc! { "user_id": id })
                .session(&mut session)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;

            if result.deleted_count == 0 {
                return Ok(false);
            }

            detach_all_for_user(&self.explorations(), &mut session, id).await?;
            Ok::<bool, AppError>(true)
        }
        .await;

        if !Database::finish_transaction(session, deleted).await? {
            return Ok(false);
        }

        debug!("사용자 삭제: user_id={}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, StorageBackend};

    /// `MONGODB_TEST_URI`가 가리키는 레플리카 셋에 일회용 데이터베이스로 연결합니다.
    async fn replica_set_repository() -> MongoUserRepository {
        let uri = std::env::var("MONGODB_TEST_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/?replicaSet=rs0".to_string());
        let config = DatabaseConfig {
            uri,
            database_name: format!("moya_test_{}", std::process::id()),
            app_name: "moya_backend_test".to_string(),
            backend: StorageBackend::Mongo,
        };
        let database = Arc::new(Database::new(&config).await.unwrap());
        database.get_database().drop().await.unwrap();

        let repo = MongoUserRepository::new(database);
        repo.create_indexes().await.unwrap();
        repo
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB replica set; opt-in via MONGODB_TEST_URI"]
    async fn test_create_with_unknown_exploration_rolls_back_insert() {
        let repo = replica_set_repository().await;
        let mut user = User::new("a@x.com", "Ann");
        user.add_exploration(Exploration::new(999, None));

        assert!(matches!(repo.create(user).await, Err(AppError::NotFound(_))));
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB replica set; opt-in via MONGODB_TEST_URI"]
    async fn test_update_with_unknown_exploration_keeps_stored_fields() {
        let repo = replica_set_repository().await;
        let mut user = repo.create(User::new("a@x.com", "Ann")).await.unwrap();

        user.set_locale(Some("ko-KR".to_string()));
        user.add_exploration(Exploration::new(999, None));

        assert!(matches!(repo.update(&user).await, Err(AppError::NotFound(_))));
        let stored = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.locale(), None);
    }
}
