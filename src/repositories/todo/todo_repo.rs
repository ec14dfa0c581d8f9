//! 할 일 리포지토리

use std::ops::Deref;
use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use crate::core::errors::AppResult;
use crate::db::context::MongoContext;
use crate::db::query::{FindQuery, Page, SortOrder, UpdateDefinition};
use crate::domain::entities::todo::TodoListContent;
use crate::repositories::base_repo::MongoRepository;

pub struct TodoRepository {
    base: MongoRepository<TodoListContent>,
}

impl TodoRepository {
    pub fn new(context: Arc<MongoContext>) -> Self {
        Self {
            base: MongoRepository::new(context),
        }
    }

    pub fn owner_filter(user_id: ObjectId) -> Document {
        doc! { "user_id": user_id }
    }

    /// 사용자의 할 일을 만료 시각 오름차순으로 한 페이지 조회합니다.
    pub async fn find_by_user(&self, user_id: ObjectId, page: Page) -> AppResult<Vec<TodoListContent>> {
        let query = FindQuery::new()
            .sort_by("expiration_time", SortOrder::Ascending)
            .sort_by("create_date", SortOrder::Ascending);

        self.find_list_by_page(Self::owner_filter(user_id), page, &query)
            .await
    }

    pub async fn count_by_user(&self, user_id: ObjectId) -> AppResult<u64> {
        self.count(Self::owner_filter(user_id)).await
    }

    pub fn pending_filter(user_id: ObjectId) -> Document {
        doc! {
            "user_id": user_id,
            "complete_status": TodoListContent::PENDING,
        }
    }

    pub async fn count_pending_by_user(&self, user_id: ObjectId) -> AppResult<u64> {
        self.count(Self::pending_filter(user_id)).await
    }

    /// 사용자의 진행 중인 할 일을 모두 완료 처리합니다.
    pub async fn complete_all_for_user(&self, user_id: ObjectId) -> AppResult<()> {
        let filter = Self::pending_filter(user_id);
        let update = UpdateDefinition::new()
            .set("complete_status", TodoListContent::COMPLETED)
            .set("update_date", DateTime::now());

        self.update_many(filter, update).await
    }
}

impl Deref for TodoRepository {
    type Target = MongoRepository<TodoListContent>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::command::WriteIntent;
    use crate::db::context::tests::lazy_context;
    use crate::db::context::WriteMode;

    #[actix_web::test]
    async fn test_complete_all_queues_update_many_for_pending_items() {
        let context = Arc::new(lazy_context(WriteMode::Deferred).await);
        let repo = TodoRepository::new(context.clone());
        let owner = ObjectId::new();

        repo.complete_all_for_user(owner).await.unwrap();

        let pending = context.pending();
        assert_eq!(pending.len(), 1);
        match &pending[0].intent {
            WriteIntent::UpdateMany { filter, update } => {
                assert_eq!(filter, &doc! { "user_id": owner, "complete_status": 0 });
                let set = update.get_document("$set").unwrap();
                assert_eq!(set.get_i32("complete_status").unwrap(), 1);
                assert!(set.contains_key("update_date"));
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }
}
