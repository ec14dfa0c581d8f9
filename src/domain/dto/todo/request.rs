use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 할 일 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// 소유 사용자 ID (ObjectId 16진수 문자열)
    #[validate(length(equal = 24, message = "user_id는 24자리 ObjectId여야 합니다"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 500, message = "내용은 1-500자 사이여야 합니다"))]
    pub content: String,

    /// RFC 3339 만료 시각
    pub expiration_time: DateTime<Utc>,

    #[serde(default)]
    pub is_remind: bool,

    /// 만료 몇 시간 전에 알릴지
    #[serde(default)]
    #[validate(range(min = 0, max = 720, message = "remind_time은 0-720 사이여야 합니다"))]
    pub remind_time: i32,
}

impl CreateTodoRequest {
    pub fn expiration(&self) -> bson::DateTime {
        to_bson_date(&self.expiration_time)
    }
}

/// 할 일 전체 수정 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 500, message = "내용은 1-500자 사이여야 합니다"))]
    pub content: String,

    pub expiration_time: DateTime<Utc>,

    pub is_remind: bool,

    #[validate(range(min = 0, max = 720, message = "remind_time은 0-720 사이여야 합니다"))]
    pub remind_time: i32,

    #[validate(range(min = 0, max = 1, message = "complete_status는 0 또는 1이어야 합니다"))]
    pub complete_status: i32,
}

impl UpdateTodoRequest {
    pub fn expiration(&self) -> bson::DateTime {
        to_bson_date(&self.expiration_time)
    }
}

/// 할 일 목록 쿼리 (`?user_id=&page_index=&page_size=`)
#[derive(Debug, Clone, Deserialize)]
pub struct TodoPageQuery {
    pub user_id: String,
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
}

fn to_bson_date(value: &DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}
