pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::auth::{AuthMiddleware, DbGate, RequireRole};

/// Wires the `/api/v1` services: health is ungated, auth and tasks sit
/// behind the database-readiness gate, tasks additionally behind the bearer
/// middleware, and delete behind the admin role gate.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(
            web::scope("/auth")
                .wrap(DbGate)
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/tasks")
                // Registration order is inside-out: the gate runs before auth.
                .wrap(AuthMiddleware)
                .wrap(DbGate)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(
                    web::resource("/{id}")
                        .route(web::put().to(tasks::update_task))
                        .route(web::delete().to(tasks::delete_task).wrap(RequireRole::admin())),
                ),
        );
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({ "message": "Route not found" }))
}
