//! 모야(moya) 사용자 저장소 백엔드
//!
//! 사용자 계정 레코드와 탐험 기록 연관을 저장소에 매핑하는 라이브러리입니다.
//!
//! # Features
//!
//! - **사용자 엔티티**: 이메일, 이름, OAuth 프로바이더 연결, 프로필 이미지, 로케일
//! - **저장소 할당 id**: 삽입 시점에 시퀀스에서 한 번 발급, 이후 불변
//! - **제약 조건**: 이메일 유니크, 이메일/이름 필수, 프로필 이미지 URL 512자 제한
//! - **비소유 1:N 연관**: 탐험 기록의 `user_id` 외래 키
//! - **MongoDB**: 운영 저장소, **Memory**: 테스트 및 로컬 저장소
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Domain      │ ← User, Exploration 엔티티
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 제약 검사, id 발급, 연관 동기화
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB / Memory│ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use moya_backend::domain::entities::users::User;
//! use moya_backend::repositories::{memory::MemoryStore, UserRepository};
//!
//! let store = MemoryStore::new();
//! let ann = store.create(User::new("a@x.com", "Ann")).await?;
//! assert_eq!(ann.id(), Some(1));
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod repositories;
