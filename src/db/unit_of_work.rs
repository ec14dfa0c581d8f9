//! Unit of Work
//!
//! 서비스가 커밋 결과를 `bool`로 받도록 컨텍스트의 커밋을 감쌉니다.
//! 대기 중인 명령이 없으면 `false`이며, 이는 실패가 아니라 "변경 없음"입니다.

use std::sync::Arc;
use mongodb::ClientSession;
use crate::core::errors::AppResult;
use crate::db::context::MongoContext;

pub struct UnitOfWork {
    context: Arc<MongoContext>,
}

impl UnitOfWork {
    pub fn new(context: Arc<MongoContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<MongoContext> {
        &self.context
    }

    /// 대기 중인 명령을 하나의 트랜잭션으로 반영합니다.
    ///
    /// 반영된 명령이 있으면 `true`, 큐가 비어 있었거나 트랜잭션이 롤백되면 `false`.
    pub async fn commit(&self) -> AppResult<bool> {
        Ok(self.context.save_changes().await? > 0)
    }

    /// 호출자가 소유하는 세션을 시작합니다.
    ///
    /// 세션을 드롭하면 세션이 종료되고 열린 트랜잭션은 중단됩니다.
    pub async fn start_transaction(&self) -> AppResult<ClientSession> {
        self.context.start_session().await
    }

    /// 주어진 세션 안에서 대기 중인 명령을 반영합니다.
    ///
    /// 롤백되면 `AppError::CommitAborted`를 반환합니다.
    pub async fn commit_session(&self, session: &mut ClientSession) -> AppResult<bool> {
        Ok(self.context.save_changes_in(session).await? > 0)
    }
}
