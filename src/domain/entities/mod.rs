//! # Domain Entities Module
//!
//! 영속 엔티티들을 정의합니다. 각 엔티티는 저장소의 테이블(컬렉션) 하나와
//! 대응되며, 식별자는 항상 저장소가 할당합니다.
//!
//! ```text
//! Users (user_id) 1 ─────── N Exploration (user_id FK)
//! ```
//!
//! 연관은 비소유입니다. 사용자를 삭제해도 탐험 기록은 남고 외래 키만 비워집니다.

pub mod explorations;
pub mod users;
