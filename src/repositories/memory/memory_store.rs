//! # 메모리 저장소 구현
//!
//! `RwLock`으로 보호되는 정렬 맵 두 개(`Users`, `Exploration`)와
//! 단조 증가 시퀀스로 저장소 계약을 구현합니다.
//!
//! 사용자 행에는 연관 목록을 저장하지 않습니다. 연관은 항상 탐험 기록의
//! `user_id` 외래 키에서 다시 계산되므로 두 표현이 어긋날 수 없습니다.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use log::debug;

use crate::domain::entities::explorations::Exploration;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult, ErrorContext};
use crate::repositories::constraints::check_user;
use crate::repositories::{ExplorationRepository, UserRepository};

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    explorations: BTreeMap<i64, Exploration>,
    user_seq: i64,
    exploration_seq: i64,
}

impl MemoryState {
    /// 연관 탐험 기록을 채운 사용자 사본
    fn load(&self, id: i64) -> Option<User> {
        let user = self.users.get(&id)?.clone();
        Some(user.with_loaded_explorations(
            self.explorations
                .values()
                .filter(|e| e.user_id() == Some(id))
                .cloned()
                .collect(),
        ))
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|(id, user)| Some(*id) != except && user.email() == Some(email))
    }

    fn ensure_explorations_exist(&self, explorations: &[Exploration]) -> AppResult<()> {
        match explorations
            .iter()
            .find(|e| !self.explorations.contains_key(&e.id()))
        {
            Some(missing) => Err(AppError::NotFound(format!("exploration {}", missing.id()))),
            None => Ok(()),
        }
    }

    /// 목록에 있는 기록은 `user_id`로 연결하고, 로드 시점에 연결되어 있었지만
    /// 목록에서 빠진 기록만 분리합니다. 로드 이후 다른 경로로 연결된 기록은 유지됩니다.
    fn sync_explorations(&mut self, user: &User, user_id: i64) {
        let listed: HashSet<i64> = user.explorations().iter().map(Exploration::id).collect();
        let removed: HashSet<i64> = user
            .loaded_exploration_ids()
            .iter()
            .copied()
            .filter(|id| !listed.contains(id))
            .collect();

        for (id, exploration) in self.explorations.iter_mut() {
            let owner = if listed.contains(id) {
                Some(user_id)
            } else if removed.contains(id) && exploration.user_id() == Some(user_id) {
                None
            } else {
                continue;
            };
            *exploration = exploration.clone().linked_to(owner);
        }
    }

    /// 사용자를 참조하는 모든 기록의 `user_id`를 비웁니다.
    fn detach_explorations(&mut self, user_id: i64) {
        for exploration in self.explorations.values_mut() {
            if exploration.user_id() == Some(user_id) {
                *exploration = exploration.clone().linked_to(None);
            }
        }
    }
}

/// 메모리 기반 사용자/탐험 저장소
///
/// 하나의 인스턴스가 [`UserRepository`]와 [`ExplorationRepository`]를 모두 구현하므로
/// 외래 키 검사와 연관 동기화가 같은 잠금 안에서 일어납니다.
///
/// ```rust,ignore
/// let store = MemoryStore::new();
/// let ann = store.create(User::new("a@x.com", "Ann")).await?;
/// let exploration = store.create_exploration(ann.id()).await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 사용자 수
    pub fn user_count(&self) -> AppResult<usize> {
        let state = self.state.read().context("memory store lock poisoned")?;
        Ok(state.users.len())
    }
}

/// 저장 행에는 연관 목록을 두지 않습니다.
fn to_row(user: &User, id: i64) -> User {
    user.clone().with_id(id).with_loaded_explorations(Vec::new())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User) -> AppResult<User> {
        check_user(&user)?;

        let mut state = self.state.write().context("memory store lock poisoned")?;
        let email = user.email().unwrap_or_default();
        if state.email_taken(email, None) {
            return Err(AppError::ConflictError(format!("이미 사용 중인 이메일입니다: {}", email)));
        }
        state.ensure_explorations_exist(user.explorations())?;

        state.user_seq += 1;
        let id = state.user_seq;
        state.users.insert(id, to_row(&user, id));
        state.sync_explorations(&user, id);

        debug!("사용자 생성: user_id={}", id);
        state
            .load(id)
            .ok_or_else(|| AppError::InternalError(format!("user {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.read().context("memory store lock poisoned")?;
        Ok(state.load(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().context("memory store lock poisoned")?;
        let id = state
            .users
            .iter()
            .find(|(_, user)| user.email() == Some(email))
            .map(|(id, _)| *id);
        Ok(id.and_then(|id| state.load(id)))
    }

    async fn find_by_oauth_account(&self, provider: &str, oauth_id: &str) -> AppResult<Option<User>> {
        let state = self.state.read().context("memory store lock poisoned")?;
        let id = state
            .users
            .iter()
            .find(|(_, user)| {
                user.oauth_provider() == Some(provider) && user.oauth_id() == Some(oauth_id)
            })
            .map(|(id, _)| *id);
        Ok(id.and_then(|id| state.load(id)))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let id = user
            .id()
            .ok_or_else(|| AppError::NotFound("저장되지 않은 사용자입니다".to_string()))?;
        check_user(user)?;

        let mut state = self.state.write().context("memory store lock poisoned")?;
        if !state.users.contains_key(&id) {
            return Err(AppError::NotFound(format!("user {}", id)));
        }
        let email = user.email().unwrap_or_default();
        if state.email_taken(email, Some(id)) {
            return Err(AppError::ConflictError(format!("이미 사용 중인 이메일입니다: {}", email)));
        }
        state.ensure_explorations_exist(user.explorations())?;

        state.users.insert(id, to_row(user, id));
        state.sync_explorations(user, id);

        debug!("사용자 갱신: user_id={}", id);
        state
            .load(id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.write().context("memory store lock poisoned")?;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.detach_explorations(id);

        debug!("사용자 삭제: user_id={}", id);
        Ok(true)
    }
}

#[async_trait]
impl ExplorationRepository for MemoryStore {
    async fn create_exploration(&self, user_id: Option<i64>) -> AppResult<Exploration> {
        let mut state = self.state.write().context("memory store lock poisoned")?;
        if let Some(owner) = user_id {
            if !state.users.contains_key(&owner) {
                return Err(AppError::NotFound(format!("user {}", owner)));
            }
        }

        state.exploration_seq += 1;
        let exploration = Exploration::new(state.exploration_seq, user_id);
        state.explorations.insert(exploration.id(), exploration.clone());
        Ok(exploration)
    }

    async fn find_exploration(&self, id: i64) -> AppResult<Option<Exploration>> {
        let state = self.state.read().context("memory store lock poisoned")?;
        Ok(state.explorations.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Exploration>> {
        let state = self.state.read().context("memory store lock poisoned")?;
        Ok(state
            .explorations
            .values()
            .filter(|e| e.user_id() == Some(user_id))
            .cloned()
            .collect())
    }
}
