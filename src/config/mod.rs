//! 환경 변수 기반 설정 모듈
//!
//! 실행 환경(`Environment`), MongoDB 연결(`MongoConfig`), HTTP 서버(`ServerConfig`),
//! 비밀번호 다이제스트(`PasswordConfig`), 페이지 크기(`PagingConfig`) 설정을 제공합니다.
//!
//! ```bash
//! # .env.dev
//! ENVIRONMENT=development
//! MONGODB_URI=mongodb://localhost:27017/?replicaSet=rs0
//! DATABASE_NAME=yy_todolist_dev
//! BCRYPT_COST=4
//! ```

pub mod data_config;

pub use data_config::*;
