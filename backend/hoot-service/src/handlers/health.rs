/// Health endpoints, served outside the authenticated scope
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Storage ping; 503 when the database is unreachable
pub async fn health_summary(service: web::Data<PostService>) -> HttpResponse {
    match service.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": "hoot-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": "hoot-service"
            }))
        }
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({"alive": true}))
}
