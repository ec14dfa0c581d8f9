use serde::{Deserialize, Serialize};
use crate::domain::dto::common::format_date;
use crate::domain::entities::todo::TodoListContent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub expiration_time: String,
    pub is_remind: bool,
    pub remind_time: i32,
    pub complete_status: i32,
    pub create_date: String,
    pub update_date: String,
}

impl From<TodoListContent> for TodoResponse {
    fn from(todo: TodoListContent) -> Self {
        Self {
            id: todo.id.to_hex(),
            user_id: todo.user_id.to_hex(),
            content: todo.content,
            expiration_time: format_date(todo.expiration_time),
            is_remind: todo.is_remind,
            remind_time: todo.remind_time,
            complete_status: todo.complete_status,
            create_date: format_date(todo.create_date),
            update_date: format_date(todo.update_date),
        }
    }
}
