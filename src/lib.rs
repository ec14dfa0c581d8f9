//! YY 할 일 목록 백엔드
//!
//! MongoDB 위에서 동작하는 사용자/할 일 관리 REST 서비스입니다.
//! 데이터 액세스는 제네릭 리포지토리와 Unit of Work 패턴을 따릅니다.
//!
//! # Features
//!
//! - **지연 쓰기**: 리포지토리의 쓰기는 명령 큐에 쌓였다가 커밋 시 하나의 트랜잭션으로 반영
//! - **제네릭 리포지토리**: `MongoRepository<T: Entity>` 하나로 모든 엔티티의 CRUD/페이지 조회
//! - **명시적 세션**: 호출자가 세션을 관리하는 트랜잭션 변형
//! - **사용자 관리**: 생성, 조회, 페이지 목록, 전체/부분 수정, 삭제
//! - **할 일 관리**: 사용자별 목록, 생성, 수정, 일괄 완료, 삭제
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증/응답 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 엔티티 구성 → 쓰기 → 커밋 → 재조회
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← MongoRepository<T>
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoContext    │ ← 명령 큐 + 트랜잭션 커밋 (UnitOfWork)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    MongoDB      │
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use yy_todolist_backend::services::users::UserService;
//!
//! let service = UserService::scoped()?;
//! let user = service.create_user(request).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod routes;
pub mod handlers;
