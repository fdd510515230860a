//! Root greeting and health check endpoints.

use actix_web::HttpResponse;
use serde::Serialize;
use social_shared::MessageResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        msg: "Hello, World!".to_string(),
    })
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
