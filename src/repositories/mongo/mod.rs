//! MongoDB 저장소 구현
//!
//! - [`user_repo::MongoUserRepository`] - `Users` 컬렉션
//! - [`exploration_repo::MongoExplorationRepository`] - `Exploration` 컬렉션
//!
//! 두 리포지토리는 같은 [`Database`](crate::db::Database)를 공유하며,
//! id는 `counters` 컬렉션의 시퀀스에서 발급됩니다.
//!
//! 저장소 계약(중복 이메일, 필수 필드, 연관 동기화)은 같은 계약을 구현하는
//! [`MemoryStore`](crate::repositories::memory::MemoryStore) 테스트로 검증하며,
//! 트랜잭션 롤백 테스트는 레플리카 셋이 있을 때만 `--ignored`로 실행합니다.

pub mod documents;
pub mod exploration_repo;
pub mod user_repo;

pub use exploration_repo::MongoExplorationRepository;
pub use user_repo::MongoUserRepository;

use mongodb::error::{Error, ErrorKind, WriteFailure};

use crate::errors::AppError;

/// 사용자 컬렉션 이름
pub const USERS_COLLECTION: &str = "Users";
/// 탐험 기록 컬렉션 이름
pub const EXPLORATION_COLLECTION: &str = "Exploration";

/// 사용자 id 시퀀스 이름
pub const USER_ID_SEQUENCE: &str = "user_id";
/// 탐험 기록 id 시퀀스 이름
pub const EXPLORATION_ID_SEQUENCE: &str = "exploration_id";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// 유니크 인덱스 위반(E11000)인지 확인합니다.
pub(crate) fn is_duplicate_key(error: &Error) -> bool {
    match *error.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(ref command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// 쓰기 에러를 변환합니다. 중복 키는 이메일 충돌로 보고합니다.
pub(crate) fn map_user_write_error(error: Error, email: &str) -> AppError {
    if is_duplicate_key(&error) {
        AppError::ConflictError(format!("이미 사용 중인 이메일입니다: {}", email))
    } else {
        AppError::DatabaseError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};
    use mongodb::error::WriteError;

    fn write_error(code: i32) -> Error {
        let write_error: WriteError = bson::from_document(doc! {
            "code": code,
            "codeName": "DuplicateKey",
            "errmsg": "E11000 duplicate key error collection: moya.Users index: email_unique",
        })
        .unwrap();
        Error::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    #[test]
    fn test_duplicate_key_maps_to_email_conflict() {
        let error = write_error(DUPLICATE_KEY_CODE);

        assert!(is_duplicate_key(&error));
        assert_eq!(
            map_user_write_error(error, "a@x.com"),
            AppError::ConflictError("이미 사용 중인 이메일입니다: a@x.com".to_string())
        );
    }

    #[test]
    fn test_other_write_error_maps_to_database_error() {
        let error = write_error(121);

        assert!(!is_duplicate_key(&error));
        assert!(matches!(
            map_user_write_error(error, "a@x.com"),
            AppError::DatabaseError(_)
        ));
    }

    #[test]
    fn test_io_error_is_not_duplicate_key() {
        let error = Error::from(std::io::Error::other("connection reset"));

        assert!(!is_duplicate_key(&error));
        assert!(matches!(
            map_user_write_error(error, "a@x.com"),
            AppError::DatabaseError(_)
        ));
    }
}
