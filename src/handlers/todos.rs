//! 할 일 HTTP 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/api/v1/todos?user_id=` | 사용자별 페이지 목록 |
//! | `GET` | `/api/v1/todos/{id}` | 조회 |
//! | `POST` | `/api/v1/todos` | 생성 |
//! | `PUT` | `/api/v1/todos/{id}` | 전체 수정 |
//! | `POST` | `/api/v1/todos/complete/{user_id}` | 사용자의 할 일 일괄 완료 |
//! | `DELETE` | `/api/v1/todos/{id}` | 삭제 후 확인 |

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::todo::{CreateTodoRequest, TodoPageQuery, UpdateTodoRequest};
use crate::services::todo::TodoService;

#[get("")]
pub async fn list_todos(
    query: web::Query<TodoPageQuery>,
) -> Result<HttpResponse, AppError> {
    let service = TodoService::scoped()?;
    let page = service.list_for_user(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[get("/{todo_id}")]
pub async fn get_todo(
    todo_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = TodoService::scoped()?;
    let todo = service.get_todo(&todo_id).await?;

    Ok(HttpResponse::Ok().json(todo))
}

#[post("")]
pub async fn create_todo(
    payload: web::Json<CreateTodoRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = TodoService::scoped()?;
    let todo = service.create_todo(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(todo))
}

#[put("/{todo_id}")]
pub async fn update_todo(
    todo_id: web::Path<String>,
    payload: web::Json<UpdateTodoRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = TodoService::scoped()?;
    let todo = service.update_todo(&todo_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(todo))
}

#[post("/complete/{user_id}")]
pub async fn complete_all(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = TodoService::scoped()?;
    let completed = service.complete_all(&user_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "completed": completed })))
}

#[delete("/{todo_id}")]
pub async fn delete_todo(
    todo_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = TodoService::scoped()?;
    let deleted = service.delete_todo(&todo_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_create_with_short_user_id_is_rejected_before_service() {
        let app = test::init_service(
            App::new().service(web::scope("/api/v1/todos").service(create_todo)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/todos")
            .set_json(json!({
                "user_id": "1234",
                "content": "장보기",
                "expiration_time": "2026-01-01T09:00:00Z"
            }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_with_unknown_complete_status_is_rejected() {
        let app = test::init_service(
            App::new().service(web::scope("/api/v1/todos").service(update_todo)),
        )
        .await;

        let request = test::TestRequest::put()
            .uri("/api/v1/todos/507f1f77bcf86cd799439011")
            .set_json(json!({
                "content": "장보기",
                "expiration_time": "2026-01-01T09:00:00Z",
                "is_remind": false,
                "remind_time": 0,
                "complete_status": 5
            }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_complete_all_without_database_is_internal_error() {
        let app = test::init_service(
            App::new().service(web::scope("/api/v1/todos").service(complete_all)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/todos/complete/507f1f77bcf86cd799439011")
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
