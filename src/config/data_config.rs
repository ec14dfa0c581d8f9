//! 실행 환경, 데이터베이스, 서버, 페이지네이션 설정
//!
//! 모든 값은 환경 변수에서 읽으며, 없거나 잘못된 값이면 기본값을 사용합니다.
//! `.env.dev` / `.env.prod` 파일은 `main`에서 `dotenv`로 미리 로드됩니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` (없으면 `NODE_ENV`) 값으로 현재 환경을 결정합니다.
    pub fn current() -> Self {
        let value = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string()));

        Self::from_str(&value)
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// 비밀번호 다이제스트 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// bcrypt cost를 반환합니다.
    ///
    /// `BCRYPT_COST`가 4..=15 범위면 그 값을, 아니면 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return cost;
                }
            }
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// MongoDB 연결 설정
///
/// ## 환경 변수
/// - `MONGODB_URI`: 연결 문자열 (기본값: `mongodb://localhost:27017`)
/// - `DATABASE_NAME`: 데이터베이스 이름 (기본값: `yy_todolist`)
/// - `MONGODB_APP_NAME`: 드라이버에 전달하는 애플리케이션 이름 (기본값: `yy_todolist`)
///
/// 트랜잭션 커밋은 레플리카 셋 또는 샤드 클러스터에서만 동작합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct MongoConfig {
    pub uri: String,
    pub database_name: String,
    pub app_name: String,
}

impl MongoConfig {
    pub const DEFAULT_URI: &'static str = "mongodb://localhost:27017";
    pub const DEFAULT_DATABASE: &'static str = "yy_todolist";

    pub fn from_env() -> Self {
        Self {
            uri: env::var("MONGODB_URI").unwrap_or_else(|_| Self::DEFAULT_URI.to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| Self::DEFAULT_DATABASE.to_string()),
            app_name: env::var("MONGODB_APP_NAME")
                .unwrap_or_else(|_| Self::DEFAULT_DATABASE.to_string()),
        }
    }
}

/// 목록 조회 페이지 크기 설정
pub struct PagingConfig;

impl PagingConfig {
    /// 요청에 페이지 크기가 없을 때 사용하는 값 (`DEFAULT_PAGE_SIZE`, 기본값 10)
    pub fn default_page_size() -> i64 {
        env::var("DEFAULT_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(10)
    }

    /// 허용하는 최대 페이지 크기 (`MAX_PAGE_SIZE`, 기본값 100)
    pub fn max_page_size() -> i64 {
        env::var("MAX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(100)
    }
}
