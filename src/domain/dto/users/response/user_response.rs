use serde::{Deserialize, Serialize};
use crate::domain::dto::common::format_date;
use crate::domain::entities::users::UserInfo;

/// 사용자 응답 DTO (비밀번호 다이제스트 제외)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub nick_name: String,
    pub status: i32,
    pub head_portrait: Option<String>,
    pub create_date: String,
    pub update_date: String,
}

impl From<UserInfo> for UserResponse {
    fn from(user: UserInfo) -> Self {
        let UserInfo {
            id,
            user_name,
            email,
            nick_name,
            status,
            head_portrait,
            create_date,
            update_date,
            ..
        } = user;

        Self {
            id: id.to_hex(),
            user_name,
            email,
            nick_name,
            status,
            head_portrait,
            create_date: format_date(create_date),
            update_date: format_date(update_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_hides_password() {
        let user = UserInfo::new(
            "alice".to_string(),
            "a@x.com".to_string(),
            "alice".to_string(),
            "$2b$04$digest".to_string(),
        );
        let id = user.id_string();

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["id"], id);
        assert_eq!(json["status"], 1);
        assert!(json.get("password").is_none());
    }
}
