//! # Service Registry
//!
//! 프로세스 전역에서 공유되는 컴포넌트를 타입 기반으로 보관하는 레지스트리입니다.
//!
//! MongoDB `Client`는 스레드 안전하며 한 번 만들어 재사용하도록 설계되어 있으므로,
//! 부트스트랩 시점에 [`Database`](crate::db::Database)를 한 번 등록하고 요청마다 꺼내 씁니다.
//! 반면 컨텍스트, 명령 큐, 리포지토리, 작업 단위, 서비스는 요청 단위로 생성되며
//! 이 레지스트리에 등록하지 않습니다.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::core::registry::ServiceLocator;
//! use crate::db::Database;
//!
//! ServiceLocator::set(Arc::new(Database::connect(&config).await?));
//!
//! // 핸들러에서
//! let database = ServiceLocator::try_get::<Database>()
//!     .ok_or_else(|| AppError::InternalError("Database not registered".to_string()))?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use once_cell::sync::Lazy;

/// 타입 기반 싱글톤 레지스트리
///
/// `TypeId`를 키로 `Arc<dyn Any + Send + Sync>`를 보관합니다.
/// 같은 타입을 다시 등록하면 기존 인스턴스를 교체합니다.
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// 인스턴스를 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_id = TypeId::of::<T>();
        let clean_name = Self::extract_clean_type_name(std::any::type_name::<T>());

        log::info!("📦 Registering: {}", clean_name);

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        instances.insert(type_id, instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 인스턴스를 가져옵니다. 없으면 `None`을 반환합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        instances
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 등록된 인스턴스를 가져옵니다.
    ///
    /// # Panics
    ///
    /// 부트스트랩에서 등록하지 않은 타입을 요청하면 패닉합니다.
    /// 요청 처리 경로에서는 [`ServiceLocator::try_get`]을 사용하세요.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        Self::try_get::<T>().unwrap_or_else(|| {
            panic!(
                "Service not found: {}. Register it with ServiceLocator::set() during bootstrap",
                std::any::type_name::<T>()
            )
        })
    }

    /// 등록 여부를 확인합니다.
    pub fn contains<T: 'static + Send + Sync>() -> bool {
        LOCATOR
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// 모듈 경로를 제거한 타입 이름을 돌려줍니다.
    ///
    /// `"crate::domain::entities::users::user_info::UserInfo"` → `"UserInfo"`
    pub fn extract_clean_type_name(type_name: &str) -> String {
        if let Some(pos) = type_name.rfind("::") {
            type_name[pos + 2..].to_string()
        } else {
            type_name.to_string()
        }
    }
}
