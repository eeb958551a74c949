//! 프로세스 내부 저장소
//!
//! MongoDB 없이 동일한 저장소 계약을 제공하는 [`MemoryStore`]를 제공합니다.
//! 테스트와 `STORAGE_BACKEND=memory` 로컬 실행에 사용됩니다.

pub mod memory_store;

pub use memory_store::MemoryStore;
