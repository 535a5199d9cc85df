// Route exports
pub mod auth;
pub mod donors;
pub mod extract;
pub mod requests;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::HealthResponse;
use crate::services::{Geocoder, NotificationDispatcher, PasswordHasher, PostgresClient, RequestStore};

pub use extract::AuthenticatedUser;

/// Application state shared across all handlers
///
/// The token service is registered separately as `web::Data<TokenService>` so
/// the `AuthenticatedUser` extractor can reach it.
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub requests: Arc<dyn RequestStore>,
    pub geocoder: Arc<Geocoder>,
    pub notifier: Arc<NotificationDispatcher>,
    pub passwords: Arc<PasswordHasher>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .service(web::scope("/auth").configure(auth::configure))
            .service(web::scope("/donors").configure(donors::configure))
            .service(web::scope("/requests").configure(requests::configure)),
    );
}

async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Welcome to BloodPlus API" }))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
