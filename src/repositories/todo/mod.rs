pub mod todo_repo;

pub use todo_repo::TodoRepository;
