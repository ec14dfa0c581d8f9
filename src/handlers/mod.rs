//! HTTP 요청 핸들러
//!
//! 핸들러는 요청 DTO를 검증하고, 요청 단위 서비스(`Service::scoped()`)를 만들어 호출한 뒤
//! 결과를 JSON으로 돌려줍니다. 에러는 `AppError`의 `ResponseError` 구현이 변환합니다.

pub mod users;
pub mod todos;
