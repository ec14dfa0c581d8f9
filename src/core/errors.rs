//! # Application Error Handling System
//!
//! 데이터 액세스 계층부터 HTTP 응답까지 공통으로 사용하는 에러 타입입니다.
//! `thiserror`로 `Error` trait을 구현하고, `actix_web::ResponseError`를 구현하여
//! 핸들러에서 `?`만으로 일관된 JSON 에러 응답을 돌려줍니다.
//!
//! ## 에러 분류
//!
//! | AppError | HTTP Status | 발생 지점 |
//! |----------|-------------|-----------|
//! | `InvalidIdentifier` | 400 Bad Request | ObjectId 형식이 아닌 ID로 조회/수정/삭제 |
//! | `ValidationError` | 400 Bad Request | 요청 DTO 검증 실패, 잘못된 페이지 번호 |
//! | `NotFound` | 404 Not Found | 리소스 없음 |
//! | `ConflictError` | 409 Conflict | 중복 이메일 등 |
//! | `StorageError` | 500 Internal Server Error | MongoDB 연결/드라이버 오류 |
//! | `CommitAborted` | 500 Internal Server Error | 트랜잭션 롤백 |
//! | `InternalError` | 500 Internal Server Error | 예상치 못한 오류 |
//!
//! ## 전파 정책
//!
//! 이 계층은 재시도하지 않습니다. 저장소 에러는 그대로 상위로 전달되며,
//! 서비스 계층이 계약상 `bool`/`None`으로 바꿔야 하는 경우에만 흡수합니다.
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! let object_id = ObjectId::parse_str(id)
//!     .map_err(|_| AppError::InvalidIdentifier(id.to_string()))?;
//!
//! collection.find_one(doc! { "_id": object_id }).await
//!     .map_err(|e| AppError::StorageError(e.to_string()))?;
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// 잘못된 식별자 (400 Bad Request)
    ///
    /// 24자리 16진수 ObjectId 문자열이 아닌 값이 조회/수정/삭제에 전달된 경우입니다.
    /// 저장소에 도달하기 전에 발생합니다.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// 저장소 에러 (500 Internal Server Error)
    ///
    /// 연결 실패, 제약 조건 위반 등 MongoDB 드라이버가 돌려준 오류입니다.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 커밋 중단 (500 Internal Server Error)
    ///
    /// 대기 중인 명령을 재생하던 중 실패하여 트랜잭션이 롤백되었습니다.
    /// 개별 명령의 결과는 복구할 수 없으며 배치 전체가 실패한 것으로 취급합니다.
    #[error("Commit aborted: {0}")]
    CommitAborted(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// MongoDB 드라이버 에러를 `StorageError`로 변환합니다.
    pub fn storage(error: mongodb::error::Error) -> Self {
        AppError::StorageError(error.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    /// 각 에러를 상태 코드와 `{"error": "..."}` JSON 본문으로 변환합니다.
    ///
    /// 5xx 에러는 서버 로그에 남깁니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::InvalidIdentifier(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("{}", self);
        }

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
///
/// ```rust,ignore
/// let hashed = bcrypt::hash(password, cost).context("비밀번호 해싱 실패")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_invalid_identifier_response() {
        let error = AppError::InvalidIdentifier("not-an-id".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Invalid identifier: not-an-id");
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("User not found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::ConflictError("duplicate email".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_storage_and_commit_errors_are_server_errors() {
        let storage = AppError::StorageError("connection refused".to_string());
        let aborted = AppError::CommitAborted("insert failed".to_string());

        assert_eq!(storage.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(aborted.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_error_with_context_is_lazy() {
        let result: Result<u8, &str> = Ok(7);
        let value = result
            .with_context(|| panic!("context must not be evaluated on success"))
            .unwrap();

        assert_eq!(value, 7);
    }
}
