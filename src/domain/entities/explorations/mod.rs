//! Explorations Entity Module
//!
//! 사용자 엔티티가 비소유 1:N 연관으로 참조하는 탐험 기록 참조 타입을 정의합니다.

pub mod exploration;

pub use exploration::Exploration;
