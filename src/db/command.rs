//! # Pending Commands
//!
//! 커밋 전까지 실행을 미루는 쓰기 명령과 그 큐, 그리고 큐를 트랜잭션 안에서
//! 재생하는 루틴을 정의합니다.
//!
//! 명령은 클로저가 아니라 "어느 컬렉션에 무엇을 쓸지"를 담은 값입니다.
//! 따라서 커밋 전에 배치를 들여다볼 수 있고, 저장소 없이도 재생 순서를 검증할 수 있습니다.
//!
//! ```text
//! Repository::add ──▶ CommandQueue::push ──┐
//! Repository::delete ─▶ CommandQueue::push ─┤   (저장소에는 아무 일도 일어나지 않음)
//!                                           ▼
//! UnitOfWork::commit ─▶ CommandQueue::drain ─▶ replay(executor)
//!                                                 begin → execute* → commit
//!                                                 (실패 시 abort)
//! ```

use std::sync::{Mutex, PoisonError};
use async_trait::async_trait;
use log::{debug, warn};
use mongodb::bson::Document;
use crate::core::errors::{AppError, AppResult};

/// 하나의 쓰기 의도
#[derive(Debug, Clone, PartialEq)]
pub enum WriteIntent {
    InsertOne { document: Document },
    InsertMany { documents: Vec<Document> },
    UpdateOne { filter: Document, update: Document },
    UpdateMany { filter: Document, update: Document },
    DeleteOne { filter: Document },
    DeleteMany { filter: Document },
}

impl WriteIntent {
    /// 로그에 남길 짧은 이름
    pub fn kind(&self) -> &'static str {
        match self {
            WriteIntent::InsertOne { .. } => "insert_one",
            WriteIntent::InsertMany { .. } => "insert_many",
            WriteIntent::UpdateOne { .. } => "update_one",
            WriteIntent::UpdateMany { .. } => "update_many",
            WriteIntent::DeleteOne { .. } => "delete_one",
            WriteIntent::DeleteMany { .. } => "delete_many",
        }
    }
}

/// 큐에 쌓인, 아직 실행되지 않은 쓰기 명령
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommand {
    /// 대상 컬렉션 이름
    pub collection: String,
    pub intent: WriteIntent,
    /// 명령을 묶은 세션의 논리 세션 ID (`lsid`). 트랜잭션 변형으로 추가된 명령만 가집니다.
    pub session: Option<Document>,
}

impl PendingCommand {
    pub fn new(collection: impl Into<String>, intent: WriteIntent) -> Self {
        Self {
            collection: collection.into(),
            intent,
            session: None,
        }
    }

    /// 명령을 특정 세션에 묶습니다.
    pub fn bound_to(mut self, session_id: Document) -> Self {
        self.session = Some(session_id);
        self
    }

    pub fn kind(&self) -> &'static str {
        self.intent.kind()
    }
}

/// 삽입 순서를 보존하는 명령 큐
///
/// `push`는 검증도 실행도 하지 않으며 실패하지 않습니다.
/// `drain`은 큐를 비우면서 쌓인 명령을 순서대로 넘겨줍니다.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Mutex<Vec<PendingCommand>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: PendingCommand) {
        debug!("queue {} on {}", command.kind(), command.collection);
        self.lock().push(command);
    }

    pub fn drain(&self) -> Vec<PendingCommand> {
        std::mem::take(&mut *self.lock())
    }

    /// 현재 쌓인 명령의 복사본
    pub fn snapshot(&self) -> Vec<PendingCommand> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PendingCommand>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 트랜잭션 경계 안에서 명령을 실행하는 주체
///
/// MongoDB 세션 구현은 [`MongoContext`](crate::db::context::MongoContext)에 있고,
/// 테스트에서는 호출 순서를 기록하는 가짜 구현을 사용합니다.
#[async_trait]
pub trait CommandExecutor: Send {
    async fn begin(&mut self) -> AppResult<()>;

    async fn execute(&mut self, command: &PendingCommand) -> AppResult<()>;

    async fn commit(&mut self) -> AppResult<()>;

    async fn abort(&mut self) -> AppResult<()>;
}

/// 명령들을 하나의 트랜잭션으로 재생합니다.
///
/// 명령은 큐에 들어온 순서대로 하나씩 실행됩니다.
/// 어느 단계든 실패하면 트랜잭션을 중단하고 `AppError::CommitAborted`를 반환합니다.
/// 성공하면 재생한 명령 수를 반환합니다 (명령별 영향 건수가 아니라 배치 적용 여부).
pub async fn replay<E>(executor: &mut E, commands: &[PendingCommand]) -> AppResult<usize>
where
    E: CommandExecutor + ?Sized,
{
    if let Err(e) = executor.begin().await {
        return Err(AppError::CommitAborted(format!("트랜잭션 시작 실패: {}", e)));
    }

    for (index, command) in commands.iter().enumerate() {
        debug!(
            "replay #{} {} on {}",
            index,
            command.kind(),
            command.collection
        );

        if let Err(e) = executor.execute(command).await {
            abort_quietly(executor).await;
            return Err(AppError::CommitAborted(format!(
                "명령 #{} ({} on {}) 실패: {}",
                index,
                command.kind(),
                command.collection,
                e
            )));
        }
    }

    if let Err(e) = executor.commit().await {
        abort_quietly(executor).await;
        return Err(AppError::CommitAborted(format!("커밋 실패: {}", e)));
    }

    Ok(commands.len())
}

async fn abort_quietly<E>(executor: &mut E)
where
    E: CommandExecutor + ?Sized,
{
    if let Err(e) = executor.abort().await {
        warn!("트랜잭션 중단 실패: {}", e);
    }
}
