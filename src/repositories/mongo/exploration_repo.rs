//! # 탐험 기록 리포지토리 구현
//!
//! `Exploration` 컬렉션에 대한 참조 수준의 접근과, 사용자 리포지토리가 사용하는
//! 외래 키(`user_id`) 연관 로드/동기화 함수를 제공합니다.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::debug;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::explorations::Exploration;
use crate::errors::{AppError, AppResult};
use crate::repositories::mongo::documents::UserDocument;
use crate::repositories::mongo::{EXPLORATION_COLLECTION, EXPLORATION_ID_SEQUENCE, USERS_COLLECTION};
use crate::repositories::ExplorationRepository;

/// 탐험 기록 참조 리포지토리
pub struct MongoExplorationRepository {
    db: Arc<Database>,
}

impl MongoExplorationRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Exploration> {
        exploration_collection(&self.db)
    }

    /// `exploration_id` 유니크 인덱스와 `user_id` 조회 인덱스를 생성합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "exploration_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("exploration_id_unique".to_string())
                .build())
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "exploration_id": 1 })
            .options(IndexOptions::builder()
                .name("user_id_fk".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([id_index, user_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

pub(crate) fn exploration_collection(db: &Database) -> Collection<Exploration> {
    db.get_database().collection::<Exploration>(EXPLORATION_COLLECTION)
}

/// 사용자에게 연결된 탐험 기록을 id 오름차순으로 로드합니다.
pub(crate) async fn load_for_user(
    collection: &Collection<Exploration>,
    user_id: i64,
) -> AppResult<Vec<Exploration>> {
    collection
        .find(doc! { "user_id": user_id })
        .sort(doc! { "exploration_id": 1 })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .try_collect::<Vec<Exploration>>()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

/// 연관을 세션의 트랜잭션 안에서 동기화합니다.
///
/// 목록의 기록은 `user_id`를 이 사용자로 설정하고, `previously_loaded` 중
/// 목록에서 빠진 기록만 `user_id`를 제거해 분리합니다. 목록에 없는 탐험 기록이
/// 하나라도 있으면 `NotFound`를 반환하며, 호출자는 트랜잭션을 중단해야 합니다.
pub(crate) async fn sync_for_user(
    collection: &Collection<Exploration>,
    session: &mut ClientSession,
    user_id: i64,
    explorations: &[Exploration],
    previously_loaded: &[i64],
) -> AppResult<()> {
    let listed: BTreeSet<i64> = explorations.iter().map(Exploration::id).collect();
    let removed = removed_links(previously_loaded, &listed);

    if !listed.is_empty() {
        let ids: Vec<i64> = listed.iter().copied().collect();
        let linked = collection
            .update_many(
                doc! { "exploration_id": { "$in": ids } },
                doc! { "$set": { "user_id": user_id } },
            )
            .session(&mut *session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if linked.matched_count < listed.len() as u64 {
            return Err(AppError::NotFound(format!("exploration in {:?}", listed)));
        }
    }

    if !removed.is_empty() {
        let detached = collection
            .update_many(
                doc! { "user_id": user_id, "exploration_id": { "$in": removed } },
                doc! { "$unset": { "user_id": "" } },
            )
            .session(&mut *session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        debug!("탐험 연관 분리: user_id={}, 분리={}", user_id, detached.modified_count);
    }

    Ok(())
}

/// 사용자를 참조하는 모든 탐험 기록의 `user_id`를 제거합니다.
pub(crate) async fn detach_all_for_user(
    collection: &Collection<Exploration>,
    session: &mut ClientSession,
    user_id: i64,
) -> AppResult<()> {
    let detached = collection
        .update_many(doc! { "user_id": user_id }, doc! { "$unset": { "user_id": "" } })
        .session(&mut *session)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    debug!("탐험 연관 분리: user_id={}, 분리={}", user_id, detached.modified_count);
    Ok(())
}

/// 로드 시점에 연결되어 있었지만 이번 목록에는 없는 탐험 id
fn removed_links(previously_loaded: &[i64], listed: &BTreeSet<i64>) -> Vec<i64> {
    previously_loaded
        .iter()
        .copied()
        .filter(|id| !listed.contains(id))
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect()
}

#[async_trait]
impl ExplorationRepository for MongoExplorationRepository {
    async fn create_exploration(&self, user_id: Option<i64>) -> AppResult<Exploration> {
        if let Some(owner) = user_id {
            let exists = self
                .db
                .get_database()
                .collection::<UserDocument>(USERS_COLLECTION)
                .count_documents(doc! { "user_id": owner })
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
            if exists == 0 {
                return Err(AppError::NotFound(format!("user {}", owner)));
            }
        }

        let id = self.db.next_sequence(EXPLORATION_ID_SEQUENCE).await?;
        let exploration = Exploration::new(id, user_id);

        self.collection()
            .insert_one(&exploration)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(exploration)
    }

    async fn find_exploration(&self, id: i64) -> AppResult<Option<Exploration>> {
        self.collection()
            .find_one(doc! { "exploration_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Exploration>> {
        load_for_user(&self.collection(), user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_links_excludes_listed_ids() {
        let listed: BTreeSet<i64> = [2, 4].into_iter().collect();

        assert_eq!(removed_links(&[1, 2, 3, 3], &listed), vec![1, 3]);
    }

    #[test]
    fn test_removed_links_is_empty_without_load_snapshot() {
        let listed: BTreeSet<i64> = BTreeSet::new();

        assert!(removed_links(&[], &listed).is_empty());
    }
}
