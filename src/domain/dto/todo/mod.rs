//! 할 일 요청/응답 DTO

pub mod request;
pub mod response;

pub use request::{CreateTodoRequest, TodoPageQuery, UpdateTodoRequest};
pub use response::TodoResponse;
