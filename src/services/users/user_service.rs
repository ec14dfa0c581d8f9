//! # 사용자 서비스
//!
//! 사용자 조회/생성/수정/삭제를 리포지토리와 Unit of Work로 조합합니다.
//!
//! ## 쓰기 흐름
//!
//! ```text
//! create_user ─▶ UserInfo::new ─▶ users.add ─▶ unit_of_work.commit ─▶ users.get_by_id
//!                  (ID 선할당)      (큐에 쌓임)     (트랜잭션 반영)        (커밋 후 조회)
//! ```
//!
//! 비밀번호는 저장 전에 `bcrypt`로 다이제스트하며, cost는 `PasswordConfig::bcrypt_cost()`를 따릅니다.

use std::sync::Arc;
use bcrypt::hash;
use log::{debug, info};
use mongodb::bson::{doc, DateTime, Document};
use serde::Serialize;
use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::core::registry::ServiceLocator;
use crate::db::context::MongoContext;
use crate::db::query::{FindQuery, SortOrder};
use crate::db::unit_of_work::UnitOfWork;
use crate::db::Database;
use crate::domain::dto::common::{resolve_page, PagedResponse};
use crate::domain::dto::users::request::{
    CreateUserRequest, UpdateProfileRequest, UpdateUserRequest, UserPageQuery,
};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::users::UserInfo;
use crate::repositories::base_repo::MongoRepository;
use crate::repositories::users::UserRepository;

/// 프로필 부분 수정 시 `$set`에 들어갈 필드
#[derive(Serialize)]
struct ProfilePatch<'a> {
    #[serde(flatten)]
    profile: &'a UpdateProfileRequest,
    update_date: DateTime,
}

pub struct UserService {
    users: UserRepository,
    unit_of_work: UnitOfWork,
}

impl UserService {
    pub fn new(context: Arc<MongoContext>) -> Self {
        Self {
            users: UserRepository::new(context.clone()),
            unit_of_work: UnitOfWork::new(context),
        }
    }

    /// 등록된 공유 `Database`로 요청 단위 서비스를 만듭니다.
    pub fn scoped() -> AppResult<Self> {
        let database = ServiceLocator::try_get::<Database>()
            .ok_or_else(|| AppError::InternalError("Database가 등록되지 않았습니다".to_string()))?;

        Ok(Self::new(Arc::new(MongoContext::new(database))))
    }

    pub async fn get_all_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.users.get_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// 닉네임/ID 조건으로 생성일 오름차순 페이지 조회
    pub async fn get_users_by_page(&self, query: UserPageQuery) -> AppResult<PagedResponse<UserResponse>> {
        let page = resolve_page(query.page_index, query.page_size)?;
        let filter = Self::page_filter(&query)?;

        let find = FindQuery::new().sort_by("create_date", SortOrder::Ascending);
        let total_count = self.users.count(filter.clone()).await?;
        let users = self.users.find_list_by_page(filter, page, &find).await?;

        Ok(PagedResponse::new(
            users.into_iter().map(UserResponse::from).collect(),
            page,
            total_count,
        ))
    }

    pub async fn get_user_by_id(&self, id: &str) -> AppResult<UserResponse> {
        let user = self.find_existing(id).await?;
        Ok(UserResponse::from(user))
    }

    /// 새 사용자를 만들고 커밋한 뒤 저장된 레코드를 반환합니다.
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let user = self.build_user(request).await?;
        let id = user.id_string();

        self.users.add(&user).await?;

        if !self.unit_of_work.commit().await? {
            return Err(AppError::CommitAborted(format!("사용자 생성이 반영되지 않았습니다: {}", id)));
        }

        info!("사용자 생성: {}", id);
        self.reload(&id).await
    }

    /// 호출자가 관리하는 세션 안에서 사용자를 만듭니다.
    ///
    /// 세션에 묶인 명령은 `commit_session` 전까지 보이지 않으며,
    /// 롤백되면 `AppError::CommitAborted`가 그대로 전달됩니다.
    pub async fn create_user_transactional(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let user = self.build_user(request).await?;
        let id = user.id_string();

        let mut session = self.unit_of_work.start_transaction().await?;
        self.users.add_transactional(&session, &user)?;

        let visible_before_commit = self.users.get_by_id(&id).await?.is_some();
        debug!("커밋 전 조회 결과 (id={}): {}", id, visible_before_commit);

        if !self.unit_of_work.commit_session(&mut session).await? {
            return Err(AppError::CommitAborted(format!("사용자 생성이 반영되지 않았습니다: {}", id)));
        }

        info!("사용자 생성 (세션): {}", id);
        self.reload(&id).await
    }

    /// 식별자와 생성일을 제외한 모든 필드를 덮어씁니다.
    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> AppResult<UserResponse> {
        let existing = self.find_existing(id).await?;

        if request.email != existing.email && self.users.exists_by_email(&request.email).await? {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        let user = UserInfo {
            id: existing.id,
            user_name: request.user_name,
            email: request.email,
            nick_name: request.nick_name,
            password: Self::digest(&request.password)?,
            status: request.status,
            head_portrait: request.head_portrait,
            create_date: existing.create_date,
            update_date: DateTime::now(),
        };

        self.users.update(&user, id).await?;
        self.commit_or_abort(id).await?;

        self.reload(id).await
    }

    /// 요청에 값이 있는 프로필 필드만 갱신합니다.
    pub async fn update_user_profile(&self, id: &str, request: UpdateProfileRequest) -> AppResult<UserResponse> {
        let existing = self.find_existing(id).await?;

        if request.nick_name.is_none() && request.head_portrait.is_none() && request.status.is_none() {
            return Err(AppError::ValidationError("수정할 프로필 필드가 없습니다".to_string()));
        }

        let patch = ProfilePatch {
            profile: &request,
            update_date: DateTime::now(),
        };

        self.users
            .update_one_from(doc! { "_id": existing.id }, &patch)
            .await?;
        self.commit_or_abort(id).await?;

        self.reload(id).await
    }

    /// 삭제 후 다시 조회하여 레코드가 사라졌는지 확인합니다.
    ///
    /// 커밋이 반영되지 않았거나 레코드가 남아 있으면 `false`.
    pub async fn delete_user(&self, id: &str) -> AppResult<bool> {
        self.find_existing(id).await?;

        self.users.delete(id).await?;
        if !self.unit_of_work.commit().await? {
            return Ok(false);
        }

        let deleted = self.users.get_by_id(id).await?.is_none();
        if deleted {
            info!("사용자 삭제: {}", id);
        }
        Ok(deleted)
    }

    async fn build_user(&self, request: CreateUserRequest) -> AppResult<UserInfo> {
        if self.users.exists_by_email(&request.email).await? {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        let mut user = UserInfo::new(
            request.user_name,
            request.email,
            request.nick_name,
            Self::digest(&request.password)?,
        );
        user.head_portrait = request.head_portrait;

        Ok(user)
    }

    async fn commit_or_abort(&self, id: &str) -> AppResult<()> {
        if !self.unit_of_work.commit().await? {
            return Err(AppError::CommitAborted(format!("사용자 수정이 반영되지 않았습니다: {}", id)));
        }
        Ok(())
    }

    async fn find_existing(&self, id: &str) -> AppResult<UserInfo> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    async fn reload(&self, id: &str) -> AppResult<UserResponse> {
        self.get_user_by_id(id).await
    }

    fn digest(password: &str) -> AppResult<String> {
        let hash_start = std::time::Instant::now();
        let digest = hash(password, PasswordConfig::bcrypt_cost()).context("비밀번호 해싱 실패")?;

        debug!("Password hashing took: {:?}", hash_start.elapsed());
        Ok(digest)
    }

    fn page_filter(query: &UserPageQuery) -> AppResult<Document> {
        let mut filter = Document::new();

        if let Some(nick_name) = query.nick_name.as_deref().filter(|s| !s.is_empty()) {
            filter.insert("nick_name", nick_name);
        }
        if let Some(id) = query.id.as_deref().filter(|s| !s.is_empty()) {
            filter.insert("_id", MongoRepository::<UserInfo>::parse_id(id)?);
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::to_document;

    #[test]
    fn test_page_filter_combines_conditions() {
        let query = UserPageQuery {
            id: Some("507f1f77bcf86cd799439011".to_string()),
            nick_name: Some("alice".to_string()),
            ..Default::default()
        };

        let filter = UserService::page_filter(&query).unwrap();

        assert_eq!(filter.get_str("nick_name").unwrap(), "alice");
        assert_eq!(
            filter.get_object_id("_id").unwrap().to_hex(),
            "507f1f77bcf86cd799439011"
        );
    }

    #[test]
    fn test_page_filter_ignores_blank_values() {
        let query = UserPageQuery {
            nick_name: Some(String::new()),
            ..Default::default()
        };

        assert!(UserService::page_filter(&query).unwrap().is_empty());
    }

    #[test]
    fn test_page_filter_rejects_malformed_id() {
        let query = UserPageQuery {
            id: Some("nope".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            UserService::page_filter(&query),
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_profile_patch_flattens_present_fields() {
        let request = UpdateProfileRequest {
            head_portrait: Some("avatars/alice.png".to_string()),
            ..Default::default()
        };
        let patch = ProfilePatch {
            profile: &request,
            update_date: DateTime::from_millis(0),
        };

        let document = to_document(&patch).unwrap();

        assert_eq!(document.len(), 2);
        assert_eq!(document.get_str("head_portrait").unwrap(), "avatars/alice.png");
        assert!(document.contains_key("update_date"));
    }

    #[test]
    fn test_digest_is_verifiable() {
        let digest = UserService::digest("secret123").unwrap();

        assert_ne!(digest, "secret123");
        assert!(bcrypt::verify("secret123", &digest).unwrap());
    }
}
