//! # 제네릭 MongoDB 리포지토리
//!
//! 엔티티 타입 하나를 컬렉션 하나에 매핑하고 CRUD, 부분 갱신, 페이지 조회, 건수 조회를 제공합니다.
//!
//! ## 쓰기와 읽기
//!
//! - 쓰기(`add`, `delete`, `update*`)는 [`PendingCommand`]로 만들어 컨텍스트에 제출합니다.
//!   지연 컨텍스트에서는 커밋 전까지 저장소가 바뀌지 않습니다.
//! - 읽기(`get_by_id`, `get_all`, `count`, `find_list*`)는 큐를 거치지 않고 바로 실행됩니다.
//!   따라서 커밋되지 않은 쓰기는 보이지 않습니다.
//! - `*_transactional` 변형은 컨텍스트 모드와 관계없이 항상 큐에 쌓이며,
//!   명령에 세션의 논리 세션 ID가 기록됩니다.
//!
//! ## 에러
//!
//! - ObjectId 형식이 아닌 ID는 저장소에 닿기 전에 `AppError::InvalidIdentifier`
//! - 드라이버 오류는 `AppError::StorageError` (재시도 없음)
//!
//! ```rust,ignore
//! let context = Arc::new(MongoContext::new(database));
//! let users: MongoRepository<UserInfo> = MongoRepository::new(context.clone());
//!
//! users.add(&user).await?;
//! UnitOfWork::new(context).commit().await?;
//!
//! let page = Page::new(1, 10)?;
//! let query = FindQuery::new().sort_by("create_date", SortOrder::Ascending);
//! let first_page = users.find_list_by_page(doc! {}, page, &query).await?;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document, Document};
use mongodb::options::{CountOptions, FindOptions};
use mongodb::{ClientSession, Collection};
use serde::{de::DeserializeOwned, Serialize};
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::db::command::{PendingCommand, WriteIntent};
use crate::db::context::MongoContext;
use crate::db::query::{FindQuery, Page, UpdateDefinition};
use crate::domain::entities::Entity;

/// 엔티티 타입 `T`에 대한 제네릭 리포지토리
pub struct MongoRepository<T: Entity> {
    context: Arc<MongoContext>,
    collection_name: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(context: Arc<MongoContext>) -> Self {
        Self {
            context,
            collection_name: T::collection_name(),
            _entity: PhantomData,
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn context(&self) -> &Arc<MongoContext> {
        &self.context
    }

    /// 타입이 지정된 컬렉션 핸들
    pub fn collection(&self) -> Collection<T> {
        self.context.get_collection::<T>(&self.collection_name)
    }

    /// 24자리 16진수 문자열을 `ObjectId`로 변환합니다.
    pub fn parse_id(id: &str) -> AppResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| AppError::InvalidIdentifier(id.to_string()))
    }

    // ---- 쓰기 ----

    /// 엔티티를 삽입합니다. 엔티티는 저장될 ID를 이미 가지고 있어야 합니다.
    pub async fn add(&self, entity: &T) -> AppResult<()> {
        let document = Self::to_bson(entity)?;
        self.context
            .submit(self.command(WriteIntent::InsertOne { document }))
            .await
    }

    /// 여러 엔티티를 한 명령으로 삽입합니다. 빈 슬라이스는 아무것도 하지 않습니다.
    pub async fn insert_many(&self, entities: &[T]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }

        let documents = entities
            .iter()
            .map(Self::to_bson)
            .collect::<AppResult<Vec<_>>>()?;

        self.context
            .submit(self.command(WriteIntent::InsertMany { documents }))
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let filter = doc! { "_id": Self::parse_id(id)? };
        self.context
            .submit(self.command(WriteIntent::DeleteOne { filter }))
            .await
    }

    pub async fn delete_many(&self, filter: Document) -> AppResult<()> {
        self.context
            .submit(self.command(WriteIntent::DeleteMany { filter }))
            .await
    }

    /// 식별자를 제외한 모든 필드를 `entity`의 값으로 덮어씁니다.
    ///
    /// 기본값으로 남아 있는 필드도 그대로 기록됩니다 (차분 갱신이 아님).
    pub async fn update(&self, entity: &T, id: &str) -> AppResult<()> {
        let filter = doc! { "_id": Self::parse_id(id)? };
        let update = entity.overwrite().into_document();

        self.context
            .submit(self.command(WriteIntent::UpdateOne { filter, update }))
            .await
    }

    /// 조건에 맞는 레코드 하나에 부분 갱신을 적용합니다.
    pub async fn update_one(&self, filter: Document, update: UpdateDefinition) -> AppResult<()> {
        let update = Self::non_empty(update)?;
        self.context
            .submit(self.command(WriteIntent::UpdateOne { filter, update }))
            .await
    }

    /// 패치 객체의 필드/값 쌍으로 레코드 하나를 갱신합니다. `_id`는 건너뜁니다.
    pub async fn update_one_from<P: Serialize>(&self, filter: Document, patch: &P) -> AppResult<()> {
        self.update_one(filter, UpdateDefinition::from_patch(patch)?)
            .await
    }

    /// 조건에 맞는 모든 레코드에 부분 갱신을 적용합니다.
    pub async fn update_many(&self, filter: Document, update: UpdateDefinition) -> AppResult<()> {
        let update = Self::non_empty(update)?;
        self.context
            .submit(self.command(WriteIntent::UpdateMany { filter, update }))
            .await
    }

    // ---- 세션에 묶인 쓰기 ----

    pub fn add_transactional(&self, session: &ClientSession, entity: &T) -> AppResult<()> {
        let document = Self::to_bson(entity)?;
        self.queue_in(session.id(), WriteIntent::InsertOne { document });
        Ok(())
    }

    pub fn delete_transactional(&self, session: &ClientSession, id: &str) -> AppResult<()> {
        self.delete_in(session.id(), id)
    }

    pub fn update_transactional(
        &self,
        session: &ClientSession,
        filter: Document,
        update: UpdateDefinition,
    ) -> AppResult<()> {
        let update = Self::non_empty(update)?;
        self.queue_in(session.id(), WriteIntent::UpdateOne { filter, update });
        Ok(())
    }

    // ---- 읽기 ----

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<T>> {
        let object_id = Self::parse_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(AppError::storage)
    }

    pub async fn get_all(&self) -> AppResult<Vec<T>> {
        self.fetch(self.collection(), doc! {}, FindOptions::default())
            .await
    }

    pub async fn count(&self, filter: Document) -> AppResult<u64> {
        self.collection()
            .count_documents(filter)
            .await
            .map_err(AppError::storage)
    }

    pub async fn exists(&self, filter: Document) -> AppResult<bool> {
        let mut options = CountOptions::default();
        options.limit = Some(1);

        let count = self
            .collection()
            .count_documents(filter)
            .with_options(options)
            .await
            .map_err(AppError::storage)?;

        Ok(count > 0)
    }

    /// 프로젝션/정렬을 적용한 목록 조회
    ///
    /// 프로젝션으로 필수 필드가 빠지면 `T`로 역직렬화할 수 없으므로,
    /// 일부 필드만 필요할 때는 [`find_list_as`](Self::find_list_as)를 사용합니다.
    pub async fn find_list(&self, filter: Document, query: &FindQuery) -> AppResult<Vec<T>> {
        self.fetch(self.collection(), filter, query.to_options(None))
            .await
    }

    /// 프로젝션한 문서를 더 좁은 뷰 타입 `P`로 받습니다.
    pub async fn find_list_as<P>(&self, filter: Document, query: &FindQuery) -> AppResult<Vec<P>>
    where
        P: DeserializeOwned + Unpin + Send + Sync,
    {
        let collection = self.context.get_collection::<P>(&self.collection_name);
        self.fetch(collection, filter, query.to_options(None))
            .await
    }

    /// `skip = (index - 1) * size`, `limit = size`로 한 페이지를 조회합니다.
    pub async fn find_list_by_page(
        &self,
        filter: Document,
        page: Page,
        query: &FindQuery,
    ) -> AppResult<Vec<T>> {
        self.fetch(self.collection(), filter, query.to_options(Some(page)))
            .await
    }

    async fn fetch<R>(
        &self,
        collection: Collection<R>,
        filter: Document,
        options: FindOptions,
    ) -> AppResult<Vec<R>>
    where
        R: DeserializeOwned + Unpin + Send + Sync,
    {
        let cursor = collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(AppError::storage)?;

        cursor.try_collect().await.map_err(AppError::storage)
    }

    fn command(&self, intent: WriteIntent) -> PendingCommand {
        PendingCommand::new(self.collection_name.as_str(), intent)
    }

    fn delete_in(&self, session_id: &Document, id: &str) -> AppResult<()> {
        let filter = doc! { "_id": Self::parse_id(id)? };
        self.queue_in(session_id, WriteIntent::DeleteOne { filter });
        Ok(())
    }

    /// `session_id`는 `ClientSession::id()`가 돌려주는 논리 세션 ID(`lsid`)
    fn queue_in(&self, session_id: &Document, intent: WriteIntent) {
        let command = self.command(intent).bound_to(session_id.clone());
        self.context.add_command(command);
    }

    fn to_bson(entity: &T) -> AppResult<Document> {
        to_document(entity).with_context(|| format!("{} 직렬화 실패", std::any::type_name::<T>()))
    }

    fn non_empty(update: UpdateDefinition) -> AppResult<Document> {
        if update.is_empty() {
            return Err(AppError::ValidationError(
                "갱신할 필드가 없습니다".to_string(),
            ));
        }
        Ok(update.into_document())
    }
}
