//! src/routes/health_check.rs
use actix_web::HttpResponse;

/// Liveness probe; never touches storage.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
