//! Exploration Reference
//!
//! 사용자에게 연결되는 탐험 기록의 참조 표현입니다.
//! 탐험 자체의 내부 필드(경로, 도감 등)는 탐험 모듈이 소유하며,
//! 이 구조체는 식별자와 외래 키(`user_id`)만 다룹니다.

use serde::{Deserialize, Serialize};

/// 탐험 기록 참조
///
/// `user_id`는 `Users.user_id`를 가리키는 외래 키입니다. 사용자가 삭제되거나
/// 연관 목록에서 빠지면 `None`으로 분리될 뿐, 기록 자체는 유지됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exploration {
    #[serde(rename = "exploration_id")]
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
}

impl Exploration {
    pub fn new(id: i64, user_id: Option<i64>) -> Self {
        Self { id, user_id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// 이 탐험을 소유한 사용자의 id (연결되지 않은 경우 `None`)
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub(crate) fn linked_to(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_to_rewrites_foreign_key_only() {
        let exploration = Exploration::new(5, None).linked_to(Some(2));

        assert_eq!(exploration.id(), 5);
        assert_eq!(exploration.user_id(), Some(2));
    }

    #[test]
    fn test_detached_exploration_omits_user_id() {
        let json = serde_json::to_value(Exploration::new(5, None)).unwrap();

        assert_eq!(json["exploration_id"], 5);
        assert!(json.get("user_id").is_none());
    }
}
