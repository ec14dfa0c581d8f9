//! 데이터 전송 객체 (DTO)
//!
//! 요청 DTO는 `validator`로 검증하고, 응답 DTO는 엔티티에서 `From`으로 변환합니다.
//! 응답에는 비밀번호 다이제스트가 포함되지 않습니다.

pub mod common;
pub mod users;
pub mod todo;
