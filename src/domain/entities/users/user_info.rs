use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::db::query::UpdateDefinition;
use crate::domain::entities::Entity;

/// 사용자 정보
///
/// 컬렉션 이름을 지정하지 않으므로 타입 이름 `UserInfo`가 컬렉션 이름이 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_name: String,
    pub email: String,
    pub nick_name: String,
    /// bcrypt 다이제스트 (평문 비밀번호는 저장하지 않음)
    pub password: String,
    /// 1 = 활성, 0 = 비활성
    pub status: i32,
    /// 프로필 이미지 참조
    #[serde(default)]
    pub head_portrait: Option<String>,
    pub create_date: DateTime,
    pub update_date: DateTime,
}

impl UserInfo {
    pub const STATUS_ACTIVE: i32 = 1;
    pub const STATUS_DISABLED: i32 = 0;

    /// 새 ID와 현재 시각으로 활성 사용자를 만듭니다.
    pub fn new(user_name: String, email: String, nick_name: String, password_digest: String) -> Self {
        let now = DateTime::now();

        Self {
            id: ObjectId::new(),
            user_name,
            email,
            nick_name,
            password: password_digest,
            status: Self::STATUS_ACTIVE,
            head_portrait: None,
            create_date: now,
            update_date: now,
        }
    }

    pub fn id_string(&self) -> String {
        self.id.to_hex()
    }

    pub fn is_active(&self) -> bool {
        self.status == Self::STATUS_ACTIVE
    }
}

impl Entity for UserInfo {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn overwrite(&self) -> UpdateDefinition {
        let UserInfo {
            id: _,
            user_name,
            email,
            nick_name,
            password,
            status,
            head_portrait,
            create_date,
            update_date,
        } = self;

        UpdateDefinition::new()
            .set("user_name", user_name.as_str())
            .set("email", email.as_str())
            .set("nick_name", nick_name.as_str())
            .set("password", password.as_str())
            .set("status", *status)
            .set("head_portrait", head_portrait.clone())
            .set("create_date", *create_date)
            .set("update_date", *update_date)
    }
}
