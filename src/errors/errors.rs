//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 사용자 저장소를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`를 사용하여 타입 안전하고 일관된 에러 처리를 제공합니다.
//!
//! 엔티티 자체는 어떤 에러도 만들지 않습니다. 모든 제약 조건 위반은
//! 저장소 경계(리포지토리)에서 발생하여 호출자에게 그대로 전달됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! match repo.create(user).await {
//!     Ok(saved) => info!("사용자 저장 완료: {:?}", saved.id()),
//!     Err(AppError::ConflictError(msg)) => warn!("이메일 중복: {}", msg),
//!     Err(e) => return Err(e),
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 저장소 계층에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (연결, 쿼리 실행 실패)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 에러 (필수/길이 이외의 선언된 제약 위반)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 필수 필드 누락 (`email`, `name`)
    #[error("Required field missing: {0}")]
    MissingField(String),

    /// 길이 제한 초과 (`profileImageUrl` 512자)
    #[error("Field too long: {field} has {actual} characters (max {max})")]
    FieldTooLong {
        field: String,
        max: u64,
        actual: u64,
    },

    /// 리소스 찾을 수 없음 (외래 키 대상 없음 포함)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (유니크 제약 위반)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 내부 에러
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 저장소 제약 조건 위반(유니크, 필수, 길이)인지 확인합니다.
    ///
    /// 호출자는 이 값으로 재시도 불가능한 입력 오류와
    /// 인프라 오류를 구분할 수 있습니다.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AppError::ConflictError(_)
                | AppError::MissingField(_)
                | AppError::FieldTooLong { .. }
                | AppError::ValidationError(_)
        )
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
