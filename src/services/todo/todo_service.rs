//! 할 일 서비스

use std::sync::Arc;
use log::info;
use mongodb::bson::DateTime;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::ServiceLocator;
use crate::db::context::MongoContext;
use crate::db::unit_of_work::UnitOfWork;
use crate::db::Database;
use crate::domain::dto::common::{resolve_page, PagedResponse};
use crate::domain::dto::todo::{CreateTodoRequest, TodoPageQuery, TodoResponse, UpdateTodoRequest};
use crate::domain::entities::todo::TodoListContent;
use crate::repositories::base_repo::MongoRepository;
use crate::repositories::todo::TodoRepository;
use crate::repositories::users::UserRepository;

pub struct TodoService {
    todos: TodoRepository,
    users: UserRepository,
    unit_of_work: UnitOfWork,
}

impl TodoService {
    pub fn new(context: Arc<MongoContext>) -> Self {
        Self {
            todos: TodoRepository::new(context.clone()),
            users: UserRepository::new(context.clone()),
            unit_of_work: UnitOfWork::new(context),
        }
    }

    pub fn scoped() -> AppResult<Self> {
        let database = ServiceLocator::try_get::<Database>()
            .ok_or_else(|| AppError::InternalError("Database가 등록되지 않았습니다".to_string()))?;

        Ok(Self::new(Arc::new(MongoContext::new(database))))
    }

    /// 사용자의 할 일 목록 (만료 시각 오름차순)
    pub async fn list_for_user(&self, query: TodoPageQuery) -> AppResult<PagedResponse<TodoResponse>> {
        let page = resolve_page(query.page_index, query.page_size)?;
        let user_id = MongoRepository::<TodoListContent>::parse_id(&query.user_id)?;

        let total_count = self.todos.count_by_user(user_id).await?;
        let todos = self.todos.find_by_user(user_id, page).await?;

        Ok(PagedResponse::new(
            todos.into_iter().map(TodoResponse::from).collect(),
            page,
            total_count,
        ))
    }

    pub async fn get_todo(&self, id: &str) -> AppResult<TodoResponse> {
        Ok(TodoResponse::from(self.find_existing(id).await?))
    }

    /// 소유 사용자가 존재할 때만 할 일을 만듭니다.
    pub async fn create_todo(&self, request: CreateTodoRequest) -> AppResult<TodoResponse> {
        if self.users.get_by_id(&request.user_id).await?.is_none() {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        let user_id = MongoRepository::<TodoListContent>::parse_id(&request.user_id)?;
        let todo = TodoListContent::new(
            user_id,
            request.content.clone(),
            request.expiration(),
            request.is_remind,
            request.remind_time,
        );
        let id = todo.id.to_hex();

        self.todos.add(&todo).await?;
        self.commit(&id).await?;

        info!("할 일 생성: {} (user={})", id, request.user_id);
        self.get_todo(&id).await
    }

    /// 식별자/소유자/생성일을 제외한 모든 필드를 덮어씁니다.
    pub async fn update_todo(&self, id: &str, request: UpdateTodoRequest) -> AppResult<TodoResponse> {
        let existing = self.find_existing(id).await?;

        let todo = TodoListContent {
            id: existing.id,
            user_id: existing.user_id,
            content: request.content.clone(),
            expiration_time: request.expiration(),
            is_remind: request.is_remind,
            remind_time: request.remind_time,
            complete_status: request.complete_status,
            create_date: existing.create_date,
            update_date: DateTime::now(),
        };

        self.todos.update(&todo, id).await?;
        self.commit(id).await?;

        self.get_todo(id).await
    }

    /// 사용자의 진행 중인 할 일을 모두 완료 처리하고, 이번 호출로 완료 처리된 건수를 반환합니다.
    ///
    /// 건수는 갱신을 큐에 넣기 직전의 진행 중 건수입니다. 진행 중인 항목이 없으면 0을 반환합니다.
    /// 배치가 롤백되면 `CommitAborted`.
    pub async fn complete_all(&self, user_id: &str) -> AppResult<u64> {
        let owner = MongoRepository::<TodoListContent>::parse_id(user_id)?;

        let pending = self.todos.count_pending_by_user(owner).await?;
        if pending == 0 {
            return Ok(0);
        }

        self.todos.complete_all_for_user(owner).await?;
        self.commit(user_id).await?;

        info!("할 일 일괄 완료: user={} ({}건)", user_id, pending);
        Ok(pending)
    }

    pub async fn delete_todo(&self, id: &str) -> AppResult<bool> {
        self.find_existing(id).await?;

        self.todos.delete(id).await?;
        if !self.unit_of_work.commit().await? {
            return Ok(false);
        }

        Ok(self.todos.get_by_id(id).await?.is_none())
    }

    async fn find_existing(&self, id: &str) -> AppResult<TodoListContent> {
        self.todos
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("할 일을 찾을 수 없습니다".to_string()))
    }

    async fn commit(&self, id: &str) -> AppResult<()> {
        if !self.unit_of_work.commit().await? {
            return Err(AppError::CommitAborted(format!("할 일 변경이 반영되지 않았습니다: {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::context::tests::lazy_context;
    use crate::db::context::WriteMode;

    async fn service() -> (Arc<MongoContext>, TodoService) {
        let context = Arc::new(lazy_context(WriteMode::Deferred).await);
        (context.clone(), TodoService::new(context))
    }

    #[actix_web::test]
    async fn test_create_with_malformed_owner_id_is_rejected() {
        let (context, service) = service().await;
        let request: CreateTodoRequest = serde_json::from_value(serde_json::json!({
            "user_id": "zzzzzzzzzzzzzzzzzzzzzzzz",
            "content": "장보기",
            "expiration_time": "2026-01-01T09:00:00Z"
        }))
        .unwrap();

        let result = service.create_todo(request).await;

        assert!(matches!(result, Err(AppError::InvalidIdentifier(_))));
        assert_eq!(context.pending_count(), 0);
    }

    #[actix_web::test]
    async fn test_complete_all_with_malformed_user_id_queues_nothing() {
        let (context, service) = service().await;

        let result = service.complete_all("not-an-object-id").await;

        assert!(matches!(result, Err(AppError::InvalidIdentifier(_))));
        assert_eq!(context.pending_count(), 0);
    }

    #[actix_web::test]
    async fn test_rolled_back_bulk_completion_is_reported_as_aborted() {
        let database = Database::lazy(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200",
            "yy_todolist_test",
        )
        .await
        .unwrap();
        let context = Arc::new(MongoContext::new(Arc::new(database)));
        let service = TodoService::new(context.clone());
        let owner = "507f1f77bcf86cd799439011";

        service
            .todos
            .complete_all_for_user(MongoRepository::<TodoListContent>::parse_id(owner).unwrap())
            .await
            .unwrap();
        let result = service.commit(owner).await;

        assert!(matches!(result, Err(AppError::CommitAborted(_))));
        assert_eq!(context.pending_count(), 0);
    }

    #[actix_web::test]
    async fn test_list_rejects_invalid_page_before_reading() {
        let (_, service) = service().await;
        let query = TodoPageQuery {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            page_index: Some(0),
            page_size: Some(10),
        };

        let result = service.list_for_user(query).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_update_and_delete_reject_malformed_ids() {
        let (context, service) = service().await;

        assert!(matches!(service.get_todo("1234").await, Err(AppError::InvalidIdentifier(_))));
        assert!(matches!(service.delete_todo("1234").await, Err(AppError::InvalidIdentifier(_))));
        assert_eq!(context.pending_count(), 0);
    }
}
