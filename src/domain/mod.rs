//! 도메인 계층
//!
//! - [`entities`] - MongoDB 컬렉션과 1:1로 매핑되는 엔티티
//! - [`dto`] - HTTP 요청/응답 데이터 전송 객체

pub mod entities;
pub mod dto;

pub use entities::{Entity, TodoListContent, UpdateLog, UserInfo};
