//! 모야 사용자 저장소 부트스트랩
//!
//! 환경 설정을 읽고 선택된 저장소 백엔드에 연결한 뒤,
//! MongoDB의 경우 `Users`/`Exploration` 컬렉션의 인덱스를 준비합니다.

use std::process::ExitCode;
use std::sync::Arc;

use env_logger::Env;
use log::{error, info};
use moya_backend::config::{load_env_file, DatabaseConfig, Environment, StorageBackend};
use moya_backend::db::Database;
use moya_backend::errors::AppResult;
use moya_backend::repositories::memory::MemoryStore;
use moya_backend::repositories::mongo::{MongoExplorationRepository, MongoUserRepository};

#[tokio::main]
async fn main() -> ExitCode {
    load_env_file();
    init_logging();

    let config = DatabaseConfig::from_env();
    info!(
        "🚀 사용자 저장소 시작중... (environment={:?}, backend={:?})",
        Environment::current(),
        config.backend
    );

    match prepare_storage(&config).await {
        Ok(()) => {
            info!("✅ 사용자 저장소 준비 완료");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("저장소 준비 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}

/// 백엔드에 연결하고 스키마 인덱스를 보장합니다.
async fn prepare_storage(config: &DatabaseConfig) -> AppResult<()> {
    match config.backend {
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            info!("메모리 저장소 사용 (사용자 {}명)", store.user_count()?);
            Ok(())
        }
        StorageBackend::Mongo => {
            info!("📡 데이터베이스 연결 중...");
            let database = Arc::new(Database::new(config).await?);

            MongoUserRepository::new(database.clone()).create_indexes().await?;
            MongoExplorationRepository::new(database.clone()).create_indexes().await?;

            info!("📍 database={}", database.database_name());
            Ok(())
        }
    }
}
