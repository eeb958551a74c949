//! # Configuration Module
//!
//! 저장소 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 저장소 백엔드, MongoDB 연결 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! export PROFILE="dev"                         # dev → .env.dev, prod → .env.prod
//! export ENVIRONMENT="development"             # development, test, staging, production
//! export STORAGE_BACKEND="mongo"               # mongo, memory
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="moya_dev"
//! ```

pub mod data_config;

pub use data_config::*;
