//! 비즈니스 로직 계층
//!
//! 서비스는 요청마다 [`MongoContext`](crate::db::MongoContext) 하나를 만들어
//! 리포지토리와 [`UnitOfWork`](crate::db::UnitOfWork)에 나눠 줍니다.
//! 흐름은 항상 "엔티티 구성 → 쓰기 명령 제출 → 커밋 → 다시 조회"입니다.

pub mod users;
pub mod todo;
