//! Database Connection Management Module
//!
//! MongoDB 연결과 요청 단위 작업 컨텍스트를 담당하는 모듈입니다.
//!
//! - [`Database`] - 프로세스 전역에서 공유하는 클라이언트 래퍼
//! - [`context::MongoContext`] - 요청 단위 명령 큐와 트랜잭션 커밋
//! - [`command`] - 대기 중인 쓰기 명령과 재생 루틴
//! - [`query`] - 갱신 정의, 페이지, 조회 옵션
//! - [`unit_of_work::UnitOfWork`] - 서비스가 사용하는 커밋 파사드
//!
//! # 환경 변수 설정
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="yy_todolist"
//! ```
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! let database = Arc::new(Database::connect(&MongoConfig::from_env()).await?);
//! ServiceLocator::set(database);
//! ```

pub mod command;
pub mod context;
pub mod query;
pub mod unit_of_work;

pub use context::{MongoContext, WriteMode};
pub use query::{FindQuery, Page, SortOrder, UpdateDefinition};
pub use unit_of_work::UnitOfWork;

use log::info;
use mongodb::{bson::doc, options::ClientOptions, Client, ClientSession};
use crate::config::MongoConfig;
use crate::core::errors::{AppError, AppResult};

/// MongoDB 데이터베이스 연결 래퍼
///
/// `Client`는 내부적으로 커넥션 풀을 가지며 스레드 안전하므로 한 번 만들어 공유합니다.
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 설정으로 클라이언트를 만들고 `ping`으로 연결을 확인합니다.
    pub async fn connect(config: &MongoConfig) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(AppError::storage)?;

        client_options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(client_options).map_err(AppError::storage)?;

        client
            .database(&config.database_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(AppError::storage)?;

        info!("✅ MongoDB 연결 성공: {}", config.database_name);

        Ok(Self::from_client(client, config.database_name.clone()))
    }

    /// 연결 확인 없이 클라이언트를 만듭니다. 실제 연결은 첫 연산 시점에 일어납니다.
    pub async fn lazy(uri: &str, database_name: &str) -> AppResult<Self> {
        let client = Client::with_uri_str(uri).await.map_err(AppError::storage)?;
        Ok(Self::from_client(client, database_name))
    }

    pub fn from_client(client: Client, database_name: impl Into<String>) -> Self {
        Self {
            client,
            database_name: database_name.into(),
        }
    }

    /// 실제 작업에 사용할 `mongodb::Database`를 반환합니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 세션/트랜잭션 등 클라이언트 레벨 작업에 사용합니다.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// 새 클라이언트 세션을 시작합니다.
    pub async fn start_session(&self) -> AppResult<ClientSession> {
        self.client
            .start_session()
            .await
            .map_err(AppError::storage)
    }
}
