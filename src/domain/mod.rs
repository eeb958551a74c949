//! # Domain Layer Module
//!
//! 도메인 계층을 구성하는 모듈입니다. 현재는 영속 엔티티만 포함합니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! └── Entities      - User, Exploration
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB)
//! ```

pub mod entities;
