//! 데이터 저장소 설정 관리 모듈
//!
//! 실행 환경, 저장소 백엔드 선택, MongoDB 연결 정보를 관리합니다.

use std::env;

use log::{error, info};

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::from_str(
            &env::var("ENVIRONMENT")
                .unwrap_or_else(|_| env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string())),
        )
    }

    /// 문자열에서 Environment를 생성합니다. 알 수 없는 값은 `Production`입니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 환경별 기본 데이터베이스 이름
    pub fn default_database_name(&self) -> &'static str {
        match self {
            Environment::Development => "moya_dev",
            Environment::Test => "moya_test",
            Environment::Staging => "moya_staging",
            Environment::Production => "moya",
        }
    }
}

/// 사용자 저장소 백엔드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// MongoDB (`Users`, `Exploration`, `counters` 컬렉션)
    Mongo,
    /// 프로세스 내부 메모리 (재시작 시 소실)
    Memory,
}

impl StorageBackend {
    /// `STORAGE_BACKEND` 값 해석. 알 수 없는 값은 `Mongo`입니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" | "in-memory" => StorageBackend::Memory,
            _ => StorageBackend::Mongo,
        }
    }
}

/// MongoDB 연결 설정
///
/// # Environment Variables
///
/// - `MONGODB_URI` - 연결 URI (기본값: `mongodb://localhost:27017`)
/// - `DATABASE_NAME` - 데이터베이스 이름 (기본값: 환경별 이름)
/// - `STORAGE_BACKEND` - `mongo` 또는 `memory` (기본값: `mongo`)
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database_name: String,
    pub app_name: String,
    pub backend: StorageBackend,
}

impl DatabaseConfig {
    /// 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> Self {
        Self::from_lookup(Environment::current(), |key| env::var(key).ok())
    }

    /// 주어진 조회 함수로 설정을 구성합니다.
    ///
    /// 테스트에서 전역 환경 변수를 건드리지 않도록 분리되어 있습니다.
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            uri: lookup("MONGODB_URI").unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: lookup("DATABASE_NAME")
                .unwrap_or_else(|| environment.default_database_name().to_string()),
            app_name: "moya_backend".to_string(),
            backend: lookup("STORAGE_BACKEND")
                .map(|value| StorageBackend::from_str(&value))
                .unwrap_or(StorageBackend::Mongo),
        }
    }
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - `.env.dev` 파일 로드 (기본값)
/// * `PROFILE=prod` - `.env.prod` 파일 로드
/// * 기타 - 기본 `.env` 파일 로드
pub fn load_env_file() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv::dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("TEST"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_storage_backend_from_string() {
        assert_eq!(StorageBackend::from_str("memory"), StorageBackend::Memory);
        assert_eq!(StorageBackend::from_str(" Mem "), StorageBackend::Memory);
        assert_eq!(StorageBackend::from_str("mongo"), StorageBackend::Mongo);
        assert_eq!(StorageBackend::from_str("postgres"), StorageBackend::Mongo);
    }

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::from_lookup(Environment::Development, |_| None);

        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "moya_dev");
        assert_eq!(config.backend, StorageBackend::Mongo);
    }

    #[test]
    fn test_database_config_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MONGODB_URI", "mongodb://db:27017"),
            ("DATABASE_NAME", "moya_it"),
            ("STORAGE_BACKEND", "memory"),
        ]);

        let config = DatabaseConfig::from_lookup(Environment::Production, |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.uri, "mongodb://db:27017");
        assert_eq!(config.database_name, "moya_it");
        assert_eq!(config.backend, StorageBackend::Memory);
    }
}
