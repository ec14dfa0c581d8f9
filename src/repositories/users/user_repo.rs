//! # 사용자 리포지토리 구현
//!
//! [`UserInfo`] 컬렉션에 대한 제네릭 CRUD 위에 이메일 조회와 인덱스 관리를 더합니다.

use std::ops::Deref;
use std::sync::Arc;
use mongodb::{bson::doc, options::IndexOptions, IndexModel};
use crate::core::errors::{AppError, AppResult};
use crate::db::context::MongoContext;
use crate::domain::entities::users::UserInfo;
use crate::repositories::base_repo::MongoRepository;

/// 사용자 데이터 액세스 리포지토리
///
/// `Deref`로 [`MongoRepository<UserInfo>`]의 모든 메서드를 그대로 사용할 수 있습니다.
///
/// ## 인덱스
/// - `email` (unique) - 중복 가입 방지, 이메일 조회
/// - `create_date` (asc) - 페이지 목록 정렬
pub struct UserRepository {
    base: MongoRepository<UserInfo>,
}

impl UserRepository {
    pub fn new(context: Arc<MongoContext>) -> Self {
        Self {
            base: MongoRepository::new(context),
        }
    }

    /// 이메일 주소로 사용자 조회
    ///
    /// * `Ok(Some(UserInfo))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 이메일의 사용자가 없는 경우
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserInfo>> {
        self.collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(AppError::storage)
    }

    pub async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        self.exists(doc! { "email": email }).await
    }

    /// 컬렉션 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 호출합니다.
    /// 이미 중복 이메일이 저장되어 있으면 유니크 인덱스 생성이 실패합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let create_date_index = IndexModel::builder()
            .keys(doc! { "create_date": 1 })
            .options(IndexOptions::builder()
                .name("create_date_asc".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([email_index, create_date_index])
            .await
            .map_err(AppError::storage)?;

        Ok(())
    }
}

impl Deref for UserRepository {
    type Target = MongoRepository<UserInfo>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
