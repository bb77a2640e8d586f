use crate::db::DbStatus;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

/// Health check endpoint
///
/// Reports database connectivity: 200 once the startup retry loop has
/// connected, 503 while it is still trying.
#[get("/health")]
pub async fn health(status: web::Data<DbStatus>) -> impl Responder {
    if status.is_connected() {
        HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "connected"
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({
            "status": "degraded",
            "database": "connecting"
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_health_reports_connecting_then_connected() {
        let status = DbStatus::new();
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(status.clone()))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["database"], "connecting");

        status.set_connected(true);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "connected");
    }
}
