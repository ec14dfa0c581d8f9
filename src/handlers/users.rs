//! # User Management HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/api/v1/users` | 전체 사용자 목록 | 200 OK |
//! | `GET` | `/api/v1/users/page` | 닉네임/ID 조건 페이지 목록 | 200 OK |
//! | `GET` | `/api/v1/users/{id}` | 사용자 조회 | 200 OK |
//! | `POST` | `/api/v1/users` | 사용자 생성 | 201 Created |
//! | `POST` | `/api/v1/users/transactional` | 명시적 세션으로 사용자 생성 | 201 Created |
//! | `PUT` | `/api/v1/users/{id}` | 전체 수정 | 200 OK |
//! | `PATCH` | `/api/v1/users/{id}` | 프로필 부분 수정 | 200 OK |
//! | `DELETE` | `/api/v1/users/{id}` | 삭제 후 확인 | 200 OK |
//!
//! `/page`는 `/{id}`보다 먼저 등록해야 경로 변수에 가로채이지 않습니다.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::{
    CreateUserRequest, UpdateProfileRequest, UpdateUserRequest, UserPageQuery,
};
use crate::services::users::UserService;

#[get("")]
pub async fn get_all_users() -> Result<HttpResponse, AppError> {
    let service = UserService::scoped()?;
    let users = service.get_all_users().await?;

    Ok(HttpResponse::Ok().json(users))
}

#[get("/page")]
pub async fn get_users_by_page(
    query: web::Query<UserPageQuery>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::scoped()?;
    let page = service.get_users_by_page(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[get("/{user_id}")]
pub async fn get_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::scoped()?;
    let user = service.get_user_by_id(&user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[post("")]
pub async fn create_user(
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::scoped()?;
    let user = service.create_user(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(user))
}

#[post("/transactional")]
pub async fn create_user_transactional(
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::scoped()?;
    let user = service.create_user_transactional(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(user))
}

#[put("/{user_id}")]
pub async fn update_user(
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::scoped()?;
    let user = service.update_user(&user_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[patch("/{user_id}")]
pub async fn update_user_profile(
    user_id: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::scoped()?;
    let user = service.update_user_profile(&user_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 삭제 결과를 `{"deleted": bool}`로 돌려줍니다.
#[delete("/{user_id}")]
pub async fn delete_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::scoped()?;
    let deleted = service.delete_user(&user_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_invalid_create_payload_is_rejected_before_service() {
        let app = test::init_service(
            App::new().service(web::scope("/api/v1/users").service(create_user)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "user_name": "alice",
                "email": "not-an-email",
                "nick_name": "alice",
                "password": "secret123"
            }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_profile_patch_with_unknown_status_is_rejected() {
        let app = test::init_service(
            App::new().service(web::scope("/api/v1/users").service(update_user_profile)),
        )
        .await;

        let request = test::TestRequest::patch()
            .uri("/api/v1/users/507f1f77bcf86cd799439011")
            .set_json(json!({ "status": 7 }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
