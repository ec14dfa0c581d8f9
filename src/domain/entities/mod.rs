//! # Domain Entities Module
//!
//! MongoDB 문서와 직접 매핑되는 엔티티와, 제네릭 리포지토리가 요구하는 [`Entity`] trait을 정의합니다.
//!
//! ## 엔티티 규칙
//!
//! - 식별자는 `ObjectId`이며 저장 전에 클라이언트에서 할당합니다 (`#[serde(rename = "_id")]`).
//!   따라서 커밋 전에도 새 레코드의 ID를 알 수 있습니다.
//! - 감사용 타임스탬프(`create_date`, `update_date`)는 BSON `DateTime`입니다.
//! - 컬렉션 이름은 [`Entity::COLLECTION`]으로 명시하거나, 생략하면 타입 이름을 사용합니다.
//!
//! ```text
//! entities/
//! ├── users/   ← UserInfo            (컬렉션: "UserInfo")
//! ├── todo/    ← TodoListContent     (컬렉션: "yyflight_todolist_content")
//! └── system/  ← UpdateLog           (컬렉션: "yyflight_todolist_updatelog")
//! ```

pub mod users;
pub mod todo;
pub mod system;

pub use users::*;
pub use todo::*;
pub use system::*;

use mongodb::bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Serialize};
use crate::core::registry::ServiceLocator;
use crate::db::query::UpdateDefinition;

/// 제네릭 리포지토리가 다룰 수 있는 영속 엔티티
///
/// `overwrite`는 식별자를 제외한 모든 필드를 할당하는 갱신 정의를 만듭니다.
/// 구현에서 구조체를 `..` 없이 분해하면, 필드를 추가하고 매핑을 빠뜨렸을 때 컴파일 에러가 납니다.
///
/// ```rust,ignore
/// // domain/entities/system/update_log.rs
/// impl Entity for UpdateLog {
///     const COLLECTION: Option<&'static str> = Some("yyflight_todolist_updatelog");
///
///     fn id(&self) -> ObjectId {
///         self.id
///     }
///
///     fn overwrite(&self) -> UpdateDefinition {
///         let UpdateLog { id: _, update_content } = self;
///         UpdateDefinition::new().set("update_content", update_content.as_str())
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static {
    /// 명시적인 컬렉션 이름. `None`이면 타입 이름을 사용합니다.
    const COLLECTION: Option<&'static str> = None;

    fn id(&self) -> ObjectId;

    /// 식별자를 제외한 모든 필드의 현재 값을 할당하는 갱신 정의 (기본값 포함, 차분 아님)
    fn overwrite(&self) -> UpdateDefinition;

    fn collection_name() -> String {
        match Self::COLLECTION {
            Some(name) => name.to_string(),
            None => ServiceLocator::extract_clean_type_name(std::any::type_name::<Self>()),
        }
    }
}
