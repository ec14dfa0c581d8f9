//! 데이터 액세스 계층
//!
//! [`MongoRepository<T>`](base_repo::MongoRepository)가 공통 CRUD를 제공하고,
//! 엔티티별 리포지토리는 이를 `Deref`로 노출하면서 전용 조회를 추가합니다.
//! 모든 리포지토리는 요청 단위 [`MongoContext`](crate::db::MongoContext)를 공유합니다.
//!
//! ```rust,ignore
//! let context = Arc::new(MongoContext::new(database));
//! let users = UserRepository::new(context.clone());
//!
//! let user = users.find_by_email("a@x.com").await?;
//! users.add(&new_user).await?;
//! ```

pub mod base_repo;
pub mod users;
pub mod todo;

pub use base_repo::MongoRepository;
