//! # Document Context
//!
//! 요청 하나 동안 살아 있는 MongoDB 작업 컨텍스트입니다.
//! 공유 [`Database`] 핸들과 대기 중인 쓰기 명령 큐를 소유하며,
//! 커밋 시 큐 전체를 하나의 트랜잭션으로 재생합니다.
//!
//! ## 수명
//!
//! 1. 요청마다 `MongoContext::new`로 생성
//! 2. 리포지토리가 쓰기 명령을 쌓음 (저장소는 아직 변하지 않음)
//! 3. `UnitOfWork::commit`이 `save_changes`를 호출하여 일괄 반영
//! 4. 커밋 없이 드롭되면 쌓인 명령은 조용히 버려짐
//!
//! 읽기는 큐를 거치지 않으므로 커밋 전의 쓰기를 볼 수 없습니다.
//!
//! ```rust,ignore
//! let context = Arc::new(MongoContext::new(database));
//! let users = UserRepository::new(context.clone());
//! let unit_of_work = UnitOfWork::new(context);
//!
//! users.add(&user).await?;
//! assert!(users.get_by_id(&user.id.to_hex()).await?.is_none());
//! assert!(unit_of_work.commit().await?);
//! ```

use std::sync::Arc;
use async_trait::async_trait;
use log::{debug, info, warn};
use mongodb::bson::Document;
use mongodb::{ClientSession, Collection};
use crate::core::errors::{AppError, AppResult};
use crate::db::command::{replay, CommandExecutor, CommandQueue, PendingCommand, WriteIntent};
use crate::db::Database;

/// 쓰기 명령 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// 큐에 쌓았다가 커밋 시 트랜잭션으로 반영
    Deferred,
    /// 즉시 저장소에 반영 (세션 없음)
    Immediate,
}

/// 요청 단위 MongoDB 컨텍스트
pub struct MongoContext {
    database: Arc<Database>,
    queue: CommandQueue,
    mode: WriteMode,
}

impl MongoContext {
    /// 쓰기를 커밋까지 미루는 컨텍스트를 생성합니다.
    pub fn new(database: Arc<Database>) -> Self {
        Self::with_mode(database, WriteMode::Deferred)
    }

    /// 쓰기를 즉시 실행하는 컨텍스트를 생성합니다.
    ///
    /// 트랜잭션 변형(`*_transactional`)으로 추가한 명령은 이 모드에서도 큐에 쌓입니다.
    pub fn immediate(database: Arc<Database>) -> Self {
        Self::with_mode(database, WriteMode::Immediate)
    }

    pub fn with_mode(database: Arc<Database>, mode: WriteMode) -> Self {
        Self {
            database,
            queue: CommandQueue::new(),
            mode,
        }
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// 이름으로 타입이 지정된 컬렉션 핸들을 가져옵니다.
    pub fn get_collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.get_database().collection::<T>(name)
    }

    /// 명령을 큐에 추가합니다. 실행하지 않으며 실패하지 않습니다.
    pub fn add_command(&self, command: PendingCommand) {
        self.queue.push(command);
    }

    /// 컨텍스트 모드에 따라 명령을 큐에 쌓거나 바로 실행합니다.
    pub async fn submit(&self, command: PendingCommand) -> AppResult<()> {
        match self.mode {
            WriteMode::Deferred => {
                self.add_command(command);
                Ok(())
            }
            WriteMode::Immediate => {
                debug!("execute {} on {}", command.kind(), command.collection);
                run_command(&self.database.get_database(), &command, None).await
            }
        }
    }

    /// 커밋 대기 중인 명령의 복사본
    pub fn pending(&self) -> Vec<PendingCommand> {
        self.queue.snapshot()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// 새 클라이언트 세션을 시작합니다. 세션의 수명은 호출자가 관리합니다.
    pub async fn start_session(&self) -> AppResult<ClientSession> {
        self.database.start_session().await
    }

    /// 큐에 쌓인 모든 명령을 하나의 트랜잭션으로 반영합니다.
    ///
    /// - 큐가 비어 있으면 저장소에 접근하지 않고 `Ok(0)`을 반환합니다.
    /// - 성공하면 큐에 있던 명령 수를 반환합니다.
    /// - 세션을 열지 못하거나 재생 중 실패하면 트랜잭션을 중단하고 `Ok(0)`을 반환합니다.
    /// - 결과와 관계없이 큐는 비워지며, 같은 배치로 다시 커밋할 수 없습니다.
    pub async fn save_changes(&self) -> AppResult<usize> {
        let commands = self.queue.drain();
        if commands.is_empty() {
            debug!("save_changes: 반영할 명령 없음");
            return Ok(0);
        }

        let mut session = match self.start_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!("세션 시작 실패 ({}개 명령 폐기): {}", commands.len(), e);
                return Ok(0);
            }
        };

        match self.replay_in(&commands, &mut session).await {
            Ok(applied) => Ok(applied),
            Err(AppError::CommitAborted(reason)) => {
                warn!("트랜잭션 롤백 ({}개 명령 폐기): {}", commands.len(), reason);
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// 호출자가 소유한 세션 안에서 큐를 반영합니다.
    ///
    /// [`save_changes`](Self::save_changes)와 같지만 롤백을
    /// `AppError::CommitAborted`로 그대로 돌려줍니다.
    pub async fn save_changes_in(&self, session: &mut ClientSession) -> AppResult<usize> {
        let commands = self.queue.drain();
        if commands.is_empty() {
            debug!("save_changes_in: 반영할 명령 없음");
            return Ok(0);
        }

        self.replay_in(&commands, session).await
    }

    /// 큐를 비우고 주어진 실행기로 재생합니다.
    pub async fn commit_with<E>(&self, executor: &mut E) -> AppResult<usize>
    where
        E: CommandExecutor + ?Sized,
    {
        let commands = self.queue.drain();
        if commands.is_empty() {
            return Ok(0);
        }

        replay(executor, &commands).await
    }

    async fn replay_in(
        &self,
        commands: &[PendingCommand],
        session: &mut ClientSession,
    ) -> AppResult<usize> {
        let mut executor = SessionExecutor {
            database: self.database.get_database(),
            session,
        };

        let applied = replay(&mut executor, commands).await?;
        info!("✅ 트랜잭션 커밋: {}개 명령 반영", applied);
        Ok(applied)
    }
}

impl Drop for MongoContext {
    fn drop(&mut self) {
        let discarded = self.queue.len();
        if discarded > 0 {
            debug!("커밋되지 않은 명령 {}개를 폐기합니다", discarded);
        }
    }
}

/// MongoDB 세션 트랜잭션으로 명령을 실행하는 실행기
struct SessionExecutor<'a> {
    database: mongodb::Database,
    session: &'a mut ClientSession,
}

#[async_trait]
impl<'a> CommandExecutor for SessionExecutor<'a> {
    async fn begin(&mut self) -> AppResult<()> {
        self.session
            .start_transaction()
            .await
            .map_err(AppError::storage)
    }

    async fn execute(&mut self, command: &PendingCommand) -> AppResult<()> {
        run_command(&self.database, command, Some(&mut *self.session)).await
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.session
            .commit_transaction()
            .await
            .map_err(AppError::storage)
    }

    async fn abort(&mut self) -> AppResult<()> {
        self.session
            .abort_transaction()
            .await
            .map_err(AppError::storage)
    }
}

/// 명령 하나를 저장소에 실행합니다. 세션이 주어지면 그 세션에서 실행합니다.
async fn run_command(
    database: &mongodb::Database,
    command: &PendingCommand,
    session: Option<&mut ClientSession>,
) -> AppResult<()> {
    let collection = database.collection::<Document>(&command.collection);

    let result = match session {
        Some(session) => match &command.intent {
            WriteIntent::InsertOne { document } => collection
                .insert_one(document)
                .session(session)
                .await
                .map(|_| ()),
            WriteIntent::InsertMany { documents } => collection
                .insert_many(documents)
                .session(session)
                .await
                .map(|_| ()),
            WriteIntent::UpdateOne { filter, update } => collection
                .update_one(filter.clone(), update.clone())
                .session(session)
                .await
                .map(|_| ()),
            WriteIntent::UpdateMany { filter, update } => collection
                .update_many(filter.clone(), update.clone())
                .session(session)
                .await
                .map(|_| ()),
            WriteIntent::DeleteOne { filter } => collection
                .delete_one(filter.clone())
                .session(session)
                .await
                .map(|_| ()),
            WriteIntent::DeleteMany { filter } => collection
                .delete_many(filter.clone())
                .session(session)
                .await
                .map(|_| ()),
        },
        None => match &command.intent {
            WriteIntent::InsertOne { document } => {
                collection.insert_one(document).await.map(|_| ())
            }
            WriteIntent::InsertMany { documents } => {
                collection.insert_many(documents).await.map(|_| ())
            }
            WriteIntent::UpdateOne { filter, update } => collection
                .update_one(filter.clone(), update.clone())
                .await
                .map(|_| ()),
            WriteIntent::UpdateMany { filter, update } => collection
                .update_many(filter.clone(), update.clone())
                .await
                .map(|_| ()),
            WriteIntent::DeleteOne { filter } => {
                collection.delete_one(filter.clone()).await.map(|_| ())
            }
            WriteIntent::DeleteMany { filter } => {
                collection.delete_many(filter.clone()).await.map(|_| ())
            }
        },
    };

    result.map_err(AppError::storage)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::command::tests::RecordingExecutor;
    use mongodb::bson::doc;

    /// 서버에 연결하지 않는 지연 클라이언트 (연결은 첫 연산 시점에 일어남)
    pub(crate) async fn lazy_context(mode: WriteMode) -> MongoContext {
        let database = Database::lazy("mongodb://localhost:27017", "yy_todolist_test")
            .await
            .expect("parse connection string");
        MongoContext::with_mode(Arc::new(database), mode)
    }

    fn insert(name: &str) -> PendingCommand {
        PendingCommand::new(
            "UserInfo",
            WriteIntent::InsertOne {
                document: doc! { "user_name": name },
            },
        )
    }

    #[actix_web::test]
    async fn test_add_command_only_queues() {
        let context = lazy_context(WriteMode::Deferred).await;

        context.add_command(insert("alice"));
        context.add_command(insert("bob"));

        assert_eq!(context.pending_count(), 2);
        assert_eq!(context.pending()[0], insert("alice"));
    }

    #[actix_web::test]
    async fn test_deferred_submit_queues_without_store_access() {
        let context = lazy_context(WriteMode::Deferred).await;

        context.submit(insert("alice")).await.unwrap();

        assert_eq!(context.mode(), WriteMode::Deferred);
        assert_eq!(context.pending_count(), 1);
    }

    #[actix_web::test]
    async fn test_save_changes_on_empty_queue_returns_zero() {
        let context = lazy_context(WriteMode::Deferred).await;

        assert_eq!(context.save_changes().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_save_changes_against_unreachable_store_returns_zero() {
        let database = Database::lazy(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200",
            "yy_todolist_test",
        )
        .await
        .expect("parse connection string");
        let context = MongoContext::new(Arc::new(database));
        context.add_command(insert("alice"));

        assert_eq!(context.save_changes().await.unwrap(), 0);
        assert_eq!(context.pending_count(), 0);
    }

    #[actix_web::test]
    async fn test_commit_with_replays_and_clears_queue() {
        let context = lazy_context(WriteMode::Deferred).await;
        context.add_command(insert("alice"));
        context.add_command(insert("bob"));

        let mut executor = RecordingExecutor::default();
        let applied = context.commit_with(&mut executor).await.unwrap();

        assert_eq!(applied, 2);
        assert_eq!(context.pending_count(), 0);
        assert_eq!(executor.calls.first().map(String::as_str), Some("begin"));
        assert_eq!(executor.calls.last().map(String::as_str), Some("commit"));
    }

    #[actix_web::test]
    async fn test_failed_commit_still_clears_queue() {
        let context = lazy_context(WriteMode::Deferred).await;
        context.add_command(insert("alice"));

        let mut executor = RecordingExecutor {
            fail_on_execute: Some(0),
            ..Default::default()
        };
        let result = context.commit_with(&mut executor).await;

        assert!(matches!(result, Err(AppError::CommitAborted(_))));
        assert_eq!(context.pending_count(), 0);

        let mut retry = RecordingExecutor::default();
        assert_eq!(context.commit_with(&mut retry).await.unwrap(), 0);
        assert!(retry.calls.is_empty());
    }
}
