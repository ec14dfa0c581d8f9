//! 라우트 설정
//!
//! ```text
//! /health
//! /api/v1/users   ← handlers::users
//! /api/v1/todos   ← handlers::todos
//! ```

use crate::handlers;
use actix_web::web;
use serde_json::json;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_user_routes(cfg);
    configure_todo_routes(cfg);
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            // "/page"는 "/{user_id}"보다 먼저
            .service(handlers::users::get_users_by_page)
            .service(handlers::users::get_all_users)
            .service(handlers::users::get_user)
            .service(handlers::users::create_user_transactional)
            .service(handlers::users::create_user)
            .service(handlers::users::update_user)
            .service(handlers::users::update_user_profile)
            .service(handlers::users::delete_user)
    );
}

fn configure_todo_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/todos")
            .service(handlers::todos::list_todos)
            .service(handlers::todos::complete_all)
            .service(handlers::todos::get_todo)
            .service(handlers::todos::create_todo)
            .service(handlers::todos::update_todo)
            .service(handlers::todos::delete_todo)
    );
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "yy_todolist_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "write_model": "Unit of Work"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let request = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "yy_todolist_backend");
    }

    #[actix_web::test]
    async fn test_user_route_without_database_reports_internal_error() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let request = test::TestRequest::get()
            .uri("/api/v1/users/507f1f77bcf86cd799439011")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
