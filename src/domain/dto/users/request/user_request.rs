//! 사용자 요청 DTO
//!
//! 클라이언트 입력은 핸들러에서 `validate()`로 검증한 뒤 서비스로 전달됩니다.
//! 이메일 중복 여부는 저장소 조회가 필요하므로 서비스 계층에서 확인합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 사용자 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// 로그인 이름 (2-30자, 영문/숫자/언더스코어)
    #[validate(length(min = 2, max = 30, message = "사용자 이름은 2-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_user_name"))]
    pub user_name: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    /// 표시 이름 (1-50자, 유니코드 허용)
    #[validate(length(min = 1, max = 50, message = "닉네임은 1-50자 사이여야 합니다"))]
    pub nick_name: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 512, message = "프로필 이미지 경로가 너무 깁니다"))]
    pub head_portrait: Option<String>,
}

/// 사용자 전체 수정 요청
///
/// 식별자와 생성 시각을 제외한 모든 필드를 덮어씁니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 30, message = "사용자 이름은 2-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_user_name"))]
    pub user_name: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "닉네임은 1-50자 사이여야 합니다"))]
    pub nick_name: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(range(min = 0, max = 1, message = "status는 0 또는 1이어야 합니다"))]
    pub status: i32,

    #[serde(default)]
    #[validate(length(max = 512, message = "프로필 이미지 경로가 너무 깁니다"))]
    pub head_portrait: Option<String>,
}

/// 프로필 부분 수정 요청
///
/// 값이 있는 필드만 `$set`에 포함됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "닉네임은 1-50자 사이여야 합니다"))]
    pub nick_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 512, message = "프로필 이미지 경로가 너무 깁니다"))]
    pub head_portrait: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1, message = "status는 0 또는 1이어야 합니다"))]
    pub status: Option<i32>,
}

/// 사용자 페이지 조회 쿼리 (`?nick_name=&id=&page_index=&page_size=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPageQuery {
    pub id: Option<String>,
    pub nick_name: Option<String>,
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
}

/// 사용자 이름 형식 검증 (영문, 숫자, 언더스코어만 허용)
fn validate_user_name(user_name: &str) -> Result<(), ValidationError> {
    if !user_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_user_name")
            .with_message("사용자 이름은 알파벳, 숫자, 언더스코어만 사용 가능합니다".into()));
    }
    Ok(())
}

/// 비밀번호 강도 검증 (문자와 숫자를 모두 포함)
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_letter && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 문자와 숫자를 포함해야 합니다".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateUserRequest {
        CreateUserRequest {
            user_name: "alice".to_string(),
            email: "a@x.com".to_string(),
            nick_name: "앨리스".to_string(),
            password: "secret123".to_string(),
            head_portrait: None,
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_email_and_user_name() {
        let mut request = create_request();
        request.email = "not-an-email".to_string();
        request.user_name = "al ice".to_string();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("user_name"));
    }

    #[test]
    fn test_weak_password_is_rejected() {
        let mut request = create_request();
        request.password = "onlyletters".to_string();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_profile_request_serializes_only_present_fields() {
        let request = UpdateProfileRequest {
            nick_name: Some("bob".to_string()),
            ..Default::default()
        };

        let document = mongodb::bson::to_document(&request).unwrap();

        assert_eq!(document.len(), 1);
        assert_eq!(document.get_str("nick_name").unwrap(), "bob");
    }

    #[test]
    fn test_profile_request_rejects_unknown_status() {
        let request = UpdateProfileRequest {
            status: Some(3),
            ..Default::default()
        };

        assert!(request.validate().is_err());
    }
}
