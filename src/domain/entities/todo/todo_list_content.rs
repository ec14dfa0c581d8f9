use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::db::query::UpdateDefinition;
use crate::domain::entities::Entity;

/// 할 일 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoListContent {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// 소유 사용자 ID
    pub user_id: ObjectId,
    pub content: String,
    pub expiration_time: DateTime,
    pub is_remind: bool,
    /// 만료 몇 시간 전에 알릴지
    pub remind_time: i32,
    /// 0 = 진행 중, 1 = 완료
    pub complete_status: i32,
    pub create_date: DateTime,
    pub update_date: DateTime,
}

impl TodoListContent {
    pub const PENDING: i32 = 0;
    pub const COMPLETED: i32 = 1;

    pub fn new(
        user_id: ObjectId,
        content: String,
        expiration_time: DateTime,
        is_remind: bool,
        remind_time: i32,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: ObjectId::new(),
            user_id,
            content,
            expiration_time,
            is_remind,
            remind_time,
            complete_status: Self::PENDING,
            create_date: now,
            update_date: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.complete_status == Self::COMPLETED
    }
}

impl Entity for TodoListContent {
    const COLLECTION: Option<&'static str> = Some("yyflight_todolist_content");

    fn id(&self) -> ObjectId {
        self.id
    }

    fn overwrite(&self) -> UpdateDefinition {
        let TodoListContent {
            id: _,
            user_id,
            content,
            expiration_time,
            is_remind,
            remind_time,
            complete_status,
            create_date,
            update_date,
        } = self;

        UpdateDefinition::new()
            .set("user_id", *user_id)
            .set("content", content.as_str())
            .set("expiration_time", *expiration_time)
            .set("is_remind", *is_remind)
            .set("remind_time", *remind_time)
            .set("complete_status", *complete_status)
            .set("create_date", *create_date)
            .set("update_date", *update_date)
    }
}
