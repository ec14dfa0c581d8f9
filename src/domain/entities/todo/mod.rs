//! 할 일 엔티티

pub mod todo_list_content;

pub use todo_list_content::TodoListContent;
